use std::cell::OnceCell;
use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use super::basic::{Card, CardError, Rank, Suit};

pub const HAND_SIZE: usize = 5;

// Nibble slots of the packed value, counted from the least significant end.
//  RF  SF  4K  FH  FL  ST  3K  P2 P1  K5 K4 K3 K2 K1
// [13][12][11][10][09][08][07][06|05][04|03|02|01|00]
const PAIR_NIBBLE: u32 = 5;
const TRIPLE_NIBBLE: u32 = 7;
const QUAD_NIBBLE: u32 = 11;
const MARKER: u64 = 0xF;

const WHEEL: [u8; HAND_SIZE] = [2, 3, 4, 5, 14];
const LOW_ACE: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("Hand already holds 5 cards")]
    HandFull,
    #[error("Hand holds {count} of 5 cards")]
    Incomplete { count: usize },
    #[error("Card {0} is already in the hand")]
    DuplicateCard(Card),
    #[error(transparent)]
    InvalidCard(#[from] CardError),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPairs,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandCategory {
    /// Strength of the category; higher beats lower regardless of kickers.
    pub fn priority(self) -> u8 {
        match self {
            HandCategory::HighCard => 0,
            HandCategory::OnePair => 1,
            HandCategory::TwoPairs => 2,
            HandCategory::ThreeOfAKind => 3,
            HandCategory::Straight => 4,
            HandCategory::Flush => 5,
            HandCategory::FullHouse => 6,
            HandCategory::FourOfAKind => 7,
            HandCategory::StraightFlush => 8,
            HandCategory::RoyalFlush => 9,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPairs => "Two Pairs",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }

    /// Nibble of a packed value that is non-zero for hands of at least this shape.
    fn probe_nibble(self) -> Option<u32> {
        match self {
            HandCategory::HighCard => None,
            HandCategory::OnePair => Some(PAIR_NIBBLE),
            HandCategory::TwoPairs => Some(PAIR_NIBBLE + 1),
            HandCategory::ThreeOfAKind => Some(TRIPLE_NIBBLE),
            HandCategory::Straight => Some(8),
            HandCategory::Flush => Some(9),
            HandCategory::FullHouse => Some(10),
            HandCategory::FourOfAKind => Some(QUAD_NIBBLE),
            HandCategory::StraightFlush => Some(12),
            HandCategory::RoyalFlush => Some(13),
        }
    }

    /// Categories flagged with a constant marker rather than a rank.
    fn marker_nibble(self) -> Option<u32> {
        match self {
            HandCategory::Straight
            | HandCategory::Flush
            | HandCategory::FullHouse
            | HandCategory::StraightFlush
            | HandCategory::RoyalFlush => self.probe_nibble(),
            _ => None,
        }
    }

    /// Recovers the category of a packed value by probing from the strongest category down.
    pub fn from_packed(value: u64) -> HandCategory {
        let mut categories: Vec<HandCategory> = HandCategory::iter().collect();
        categories.sort_by_key(|category| Reverse(category.priority()));
        categories
            .into_iter()
            .find(|category| {
                category
                    .probe_nibble()
                    .is_some_and(|nibble| (value >> (nibble * 4)) & MARKER != 0)
            })
            .unwrap_or(HandCategory::HighCard)
    }
}

impl PartialOrd for HandCategory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandCategory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Packed comparable value of a five-card hand. Compare two of these to rank hands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct HandValue(pub u64);

impl HandValue {
    pub fn category(self) -> HandCategory {
        HandCategory::from_packed(self.0)
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#016x}", self.0)
    }
}

/// Category plus the rank values that break ties inside it.
///
/// `tiebreakers` are ordered most significant first: larger groups before smaller ones,
/// higher ranks before lower ones. In a wheel straight the ace counts as 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct HandStrength {
    pub category: HandCategory,
    pub tiebreakers: Vec<u8>,
}

impl HandStrength {
    pub fn packed(&self) -> HandValue {
        // Where the leading (grouped) tiebreakers go; the rest are kickers.
        let leading: &[u32] = match self.category {
            HandCategory::OnePair => &[PAIR_NIBBLE],
            HandCategory::TwoPairs => &[PAIR_NIBBLE + 1, PAIR_NIBBLE],
            HandCategory::ThreeOfAKind => &[TRIPLE_NIBBLE],
            HandCategory::FullHouse => &[TRIPLE_NIBBLE, PAIR_NIBBLE],
            HandCategory::FourOfAKind => &[QUAD_NIBBLE],
            _ => &[],
        };
        let split = leading.len().min(self.tiebreakers.len());
        let (grouped, kickers) = self.tiebreakers.split_at(split);

        let mut value = 0u64;
        for (&nibble, &rank) in leading.iter().zip(grouped) {
            value |= field(nibble, rank as u64);
        }
        // Kickers fill from the bottom, lowest rank first.
        for (nibble, &rank) in kickers.iter().rev().enumerate() {
            value |= field(nibble as u32, rank as u64);
        }
        if let Some(nibble) = self.category.marker_nibble() {
            value |= field(nibble, MARKER);
        }
        HandValue(value)
    }
}

impl PartialOrd for HandStrength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandStrength {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.category.cmp(&other.category) {
            Ordering::Equal => self.tiebreakers.cmp(&other.tiebreakers),
            other => other,
        }
    }
}

fn field(nibble: u32, content: u64) -> u64 {
    (content & MARKER) << (nibble * 4)
}

#[derive(Debug, Clone, Copy)]
struct RankGroup {
    rank: u8,
    count: u8,
}

/// Rank values and suits sorted ascending, with the ace of a wheel lowered to 1.
///
/// Works on a copy; the cards themselves keep their ranks.
fn normalized(cards: &[Card; HAND_SIZE]) -> [(u8, Suit); HAND_SIZE] {
    let mut ranked: [(u8, Suit); HAND_SIZE] =
        std::array::from_fn(|i| (cards[i].rank.value(), cards[i].suit));
    ranked.sort_by_key(|&(rank, _)| rank);

    if ranked.map(|(rank, _)| rank) == WHEEL {
        ranked[HAND_SIZE - 1].0 = LOW_ACE;
        ranked.sort_by_key(|&(rank, _)| rank);
    }
    ranked
}

/// Evaluates five cards. Input order does not matter.
///
/// The cards are expected to be distinct; `Hand` enforces this.
pub fn evaluate(cards: &[Card; HAND_SIZE]) -> HandStrength {
    let ranked = normalized(cards);

    let mut is_flush = true;
    let mut is_straight = true;
    let mut groups: Vec<RankGroup> = Vec::with_capacity(HAND_SIZE);
    let mut count = 1;

    for pair in ranked.windows(2) {
        let (prev_rank, prev_suit) = pair[0];
        let (rank, suit) = pair[1];

        if rank != prev_rank {
            groups.push(RankGroup {
                rank: prev_rank,
                count,
            });
            count = 1;
        } else {
            count += 1;
        }

        if suit != prev_suit {
            is_flush = false;
        }

        if is_straight && rank != prev_rank + 1 {
            is_straight = false;
        }
    }
    let (high, _) = ranked[HAND_SIZE - 1];
    groups.push(RankGroup { rank: high, count });

    let triples = groups.iter().filter(|group| group.count == 3).count();
    let pairs = groups.iter().filter(|group| group.count == 2).count();

    let category = match (is_flush, is_straight) {
        (true, true) if high == Rank::Ace.value() => HandCategory::RoyalFlush,
        (true, true) => HandCategory::StraightFlush,
        _ if groups.iter().any(|group| group.count >= 4) => HandCategory::FourOfAKind,
        _ if triples == 1 && pairs == 1 => HandCategory::FullHouse,
        (true, false) => HandCategory::Flush,
        (false, true) => HandCategory::Straight,
        _ if triples == 1 => HandCategory::ThreeOfAKind,
        _ if pairs == 2 => HandCategory::TwoPairs,
        _ if pairs == 1 => HandCategory::OnePair,
        _ => HandCategory::HighCard,
    };

    groups.sort_by(|a, b| b.count.cmp(&a.count).then(b.rank.cmp(&a.rank)));

    HandStrength {
        category,
        tiebreakers: groups.iter().map(|group| group.rank).collect(),
    }
}

#[derive(Debug, Clone)]
struct Evaluation {
    strength: HandStrength,
    value: HandValue,
}

/// A player's five cards, reused across rounds.
///
/// The evaluation is computed on first access and kept until the hand changes.
#[derive(Debug, Default, Clone)]
pub struct Hand {
    cards: Vec<Card>,
    evaluation: OnceCell<Evaluation>,
}

impl Hand {
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(HAND_SIZE),
            evaluation: OnceCell::new(),
        }
    }

    pub fn add_card(&mut self, card: Card) -> Result<(), HandError> {
        if self.cards.len() == HAND_SIZE {
            return Err(HandError::HandFull);
        }
        if self.cards.contains(&card) {
            return Err(HandError::DuplicateCard(card));
        }

        self.cards.push(card);
        self.evaluation.take();
        Ok(())
    }

    pub fn add_token(&mut self, token: &str) -> Result<(), HandError> {
        self.add_card(Card::from_string(token)?)
    }

    /// Empties the hand and forgets its evaluation.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.evaluation.take();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == HAND_SIZE
    }

    fn evaluation(&self) -> Result<&Evaluation, HandError> {
        let count = self.cards.len();
        let cards: &[Card; HAND_SIZE] = self
            .cards
            .as_slice()
            .try_into()
            .map_err(|_| HandError::Incomplete { count })?;

        Ok(self.evaluation.get_or_init(|| {
            let strength = evaluate(cards);
            let value = strength.packed();
            Evaluation { strength, value }
        }))
    }

    pub fn strength(&self) -> Result<&HandStrength, HandError> {
        Ok(&self.evaluation()?.strength)
    }

    pub fn category(&self) -> Result<HandCategory, HandError> {
        Ok(self.evaluation()?.strength.category)
    }

    pub fn value(&self) -> Result<HandValue, HandError> {
        Ok(self.evaluation()?.value)
    }

    /// Orders two hands by packed value. `Equal` is a tie.
    pub fn compare(&self, other: &Hand) -> Result<Ordering, HandError> {
        Ok(self.value()?.cmp(&other.value()?))
    }

    pub fn beats(&self, other: &Hand) -> Result<bool, HandError> {
        Ok(self.compare(other)? == Ordering::Greater)
    }
}

/// Parses whitespace separated tokens, e.g. `"TH JH QH KH AH"`.
impl FromStr for Hand {
    type Err = HandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hand = Hand::new();
        for token in s.split_whitespace() {
            hand.add_token(token)?;
        }
        if !hand.is_complete() {
            return Err(HandError::Incomplete {
                count: hand.cards.len(),
            });
        }
        Ok(hand)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(Card::to_string).collect();
        write!(f, "{}", cards.join(" "))?;
        if let Ok(category) = self.category() {
            write!(f, " ({category})")?;
        }
        Ok(())
    }
}
