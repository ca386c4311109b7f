use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rstest::rstest;
use strum::IntoEnumIterator;

use super::basic::{Card, CardError, Rank, Suit};
use super::hands::{evaluate, Hand, HandCategory, HandError, HandValue, HAND_SIZE};

fn hand(s: &str) -> Hand {
    s.parse().unwrap()
}

fn five(s: &str) -> [Card; HAND_SIZE] {
    let cards: Vec<Card> = s.split_whitespace().map(|t| t.parse().unwrap()).collect();
    cards.try_into().unwrap()
}

#[rstest]
#[case("TH JH QH KH AH", HandCategory::RoyalFlush)]
#[case("5H 6H 7H 8H 9H", HandCategory::StraightFlush)]
#[case("AD 2D 3D 4D 5D", HandCategory::StraightFlush)] // wheel in one suit is not royal
#[case("7H 7D 7S 7C 2H", HandCategory::FourOfAKind)]
#[case("7H 7D 7S 2C 2H", HandCategory::FullHouse)]
#[case("2D 7D 9D JD KD", HandCategory::Flush)]
#[case("2H 3D 4S 5C AH", HandCategory::Straight)]
#[case("TH JD QS KC AH", HandCategory::Straight)]
#[case("9H 9D 9S 2C 5H", HandCategory::ThreeOfAKind)]
#[case("4H 4D 9S 9C KH", HandCategory::TwoPairs)]
#[case("4H 4D 9S TC KH", HandCategory::OnePair)]
#[case("2H 5D 9S TC KH", HandCategory::HighCard)]
#[case("AH 2D 3S 4C 6H", HandCategory::HighCard)] // one short of a wheel
#[case("QH KD AS 2C 3H", HandCategory::HighCard)] // straights do not wrap around
fn test_category(#[case] cards: &str, #[case] expected: HandCategory) {
    let hand = hand(cards);
    assert_eq!(hand.category(), Ok(expected));
    assert_eq!(hand.value().unwrap().category(), expected);
}

#[rstest]
#[case("7H 7D 7S 2C 2H", 0x0F00_7020_0000)]
#[case("2H 3D 4S 5C AH", 0x000F_0005_4321)]
#[case("4H 4D 9S 9C KH", 0x0940_000D)]
#[case("TH JH QH KH AH", 0x00F0_0000_000E_DCBA)]
#[case("7H 7D 7S 7C 2H", 0x7000_0000_0002)]
fn test_packed_layout(#[case] cards: &str, #[case] expected: u64) {
    assert_eq!(hand(cards).value(), Ok(HandValue(expected)));
}

#[rstest]
#[case("2H 3D 4S 5C AH", vec![5, 4, 3, 2, 1])]
#[case("7H 7D 7S 2C 2H", vec![7, 2])]
#[case("4H 4D 9S 9C KH", vec![9, 4, 13])]
#[case("KH 4D 9S 4C AH", vec![4, 14, 13, 9])]
#[case("7H 7D 7S 7C 2H", vec![7, 2])]
fn test_tiebreakers(#[case] cards: &str, #[case] expected: Vec<u8>) {
    assert_eq!(evaluate(&five(cards)).tiebreakers, expected);
}

#[test]
fn test_wheel_leaves_card_ranks_untouched() {
    let cards = five("AH 2D 3S 4C 5H");
    let strength = evaluate(&cards);

    assert_eq!(strength.category, HandCategory::Straight);
    assert_eq!(cards[0], Card::new(Rank::Ace, Suit::Hearts));
}

#[rstest]
#[case("TH JH QH KH AH", "5H 6H 7H 8H 9H", Ordering::Greater)] // royal over straight flush
#[case("7H 7D 7S 7C 2H", "7H 7D 7S 2C 2H", Ordering::Greater)] // quads over full house
#[case("2H 3D 4S 5C AH", "2C 3D 4H 5S 6C", Ordering::Less)] // wheel is the lowest straight
#[case("2H 3D 4S 5C AH", "AC KS 9D 7H 2C", Ordering::Greater)] // wheel still beats ace high
#[case("2H 3D 5S 9C KD", "2C 3H 5D 9S KH", Ordering::Equal)] // same ranks, no flush
#[case("2D 7D 9D JD KD", "TH JD QS KC AH", Ordering::Greater)] // flush over straight
#[case("2C 3D 4H 5S 6C", "AH AD AC KS QH", Ordering::Greater)] // straight over trips
#[case("AH AD 2C 3S 4H", "KH KD QC JS TH", Ordering::Greater)] // higher pair wins
#[case("4H 4D 9S 9C KH", "4C 4S 9H 9D QH", Ordering::Greater)] // two pairs decided by kicker
#[case("AH KD 9S 7C 3H", "AC KS 9D 7H 2C", Ordering::Greater)] // last kicker decides
#[case("5H 5C 6S 7S KD", "2C 3S 8S 8D TD", Ordering::Less)]
#[case("5D 8C 9S JS AC", "2C 5C 7D 8S QH", Ordering::Greater)]
#[case("2D 9C AS AH AC", "3D 6D 7D TD QD", Ordering::Less)]
#[case("4D 6S 9H QH QC", "3D 6D 7H QD QS", Ordering::Greater)]
#[case("2H 2D 4C 4D 4S", "3C 3D 3S 9S 9D", Ordering::Greater)]
fn test_hand_comparison(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
    let (a, b) = (hand(a), hand(b));
    assert_eq!(a.compare(&b), Ok(expected));
    assert_eq!(b.compare(&a), Ok(expected.reverse()));
    assert_eq!(a.beats(&b), Ok(expected == Ordering::Greater));
}

#[test]
fn test_category_priority_is_strictly_increasing() {
    let priorities: Vec<u8> = HandCategory::iter().map(HandCategory::priority).collect();
    assert_eq!(priorities, (0..10).collect::<Vec<u8>>());
    assert!(HandCategory::RoyalFlush > HandCategory::StraightFlush);
    assert!(HandCategory::OnePair > HandCategory::HighCard);
    assert_eq!(HandCategory::from_packed(0), HandCategory::HighCard);
}

#[test]
fn test_random_hands_are_consistent() {
    let mut rng = rand::rng();
    let mut deck = Card::all_cards();
    let mut previous = None;

    for _ in 0..2000 {
        deck.shuffle(&mut rng);
        let mut cards: [Card; HAND_SIZE] = deck[..HAND_SIZE].try_into().unwrap();
        let strength = evaluate(&cards);
        let value = strength.packed();

        assert_eq!(value.category(), strength.category);

        cards.shuffle(&mut rng);
        assert_eq!(evaluate(&cards), strength);

        if let Some((other_strength, other_value)) = previous {
            assert_eq!(strength.cmp(&other_strength), value.cmp(&other_value));
        }
        previous = Some((strength, value));
    }
}

#[test]
fn test_clear_and_refill_reproduces_value() {
    let mut hand = hand("7H 7D 7S 2C 2H");
    let value = hand.value().unwrap();
    assert_eq!(hand.category(), Ok(HandCategory::FullHouse));

    hand.clear();
    assert!(hand.cards().is_empty());
    assert_eq!(hand.value(), Err(HandError::Incomplete { count: 0 }));

    for token in ["2H", "7S", "2C", "7H", "7D"] {
        hand.add_token(token).unwrap();
    }
    assert_eq!(hand.value(), Ok(value));
}

#[test]
fn test_clear_drops_stale_evaluation() {
    let mut hand = hand("TH JH QH KH AH");
    assert_eq!(hand.category(), Ok(HandCategory::RoyalFlush));

    hand.clear();
    for token in ["2H", "5D", "9S", "TC", "KH"] {
        hand.add_token(token).unwrap();
    }
    assert_eq!(hand.category(), Ok(HandCategory::HighCard));
}

#[test]
fn test_hand_size_is_enforced() {
    let mut hand = Hand::new();
    assert_eq!(hand.category(), Err(HandError::Incomplete { count: 0 }));

    for token in ["2H", "3H", "4H", "5H"] {
        hand.add_token(token).unwrap();
    }
    assert_eq!(hand.value(), Err(HandError::Incomplete { count: 4 }));

    hand.add_token("6H").unwrap();
    assert_eq!(hand.category(), Ok(HandCategory::StraightFlush));
    assert_eq!(hand.add_token("7H"), Err(HandError::HandFull));

    assert_eq!(
        "2H 3H 4H".parse::<Hand>().err(),
        Some(HandError::Incomplete { count: 3 })
    );
}

#[test]
fn test_duplicate_and_invalid_cards_are_rejected() {
    let mut hand = Hand::new();
    hand.add_token("AH").unwrap();
    assert_eq!(
        hand.add_token("AH"),
        Err(HandError::DuplicateCard(Card::new(Rank::Ace, Suit::Hearts)))
    );
    assert_eq!(
        hand.add_token("1H"),
        Err(HandError::InvalidCard(CardError::InvalidCard {
            token: "1H".to_string()
        }))
    );
    assert_eq!(hand.cards().len(), 1);
}

#[test]
fn test_hand_display() {
    assert_eq!(hand("TH JH QH KH AH").to_string(), "TH JH QH KH AH (Royal Flush)");

    let mut partial = Hand::new();
    partial.add_token("2C").unwrap();
    assert_eq!(partial.to_string(), "2C");
}
