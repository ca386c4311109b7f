// A showdown is a sequence of rounds between two players. Each round is one line of
// ten card tokens: the first five belong to player one, the last five to player two.
use std::cmp::Ordering;
use std::io::BufRead;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::cards::{Card, CardError, Hand, HandError, HAND_SIZE};

pub const ROUND_SIZE: usize = 2 * HAND_SIZE;

#[derive(Debug, Error)]
pub enum ShowdownError {
    #[error("Failed to read rounds: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {source}")]
    InvalidCard {
        line: usize,
        #[source]
        source: CardError,
    },

    #[error("Line {line}: expected 10 cards, found {found}")]
    WrongCardCount { line: usize, found: usize },

    #[error("Line {line}: card {card} is dealt twice")]
    DuplicateCard { line: usize, card: Card },

    #[error("Hand error: {0}")]
    Hand(#[from] HandError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    PlayerOne,
    PlayerTwo,
    Tie,
}

impl Outcome {
    pub fn player_one_wins(self) -> bool {
        self == Outcome::PlayerOne
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub player_one: [Card; HAND_SIZE],
    pub player_two: [Card; HAND_SIZE],
}

impl Round {
    /// Parses one round. `line` is the 1-based line number used in errors.
    pub fn parse(line: usize, text: &str) -> Result<Self, ShowdownError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != ROUND_SIZE {
            return Err(ShowdownError::WrongCardCount {
                line,
                found: tokens.len(),
            });
        }

        let mut cards = Vec::with_capacity(ROUND_SIZE);
        for token in tokens {
            let card = Card::from_string(token)
                .map_err(|source| ShowdownError::InvalidCard { line, source })?;
            if cards.contains(&card) {
                return Err(ShowdownError::DuplicateCard { line, card });
            }
            cards.push(card);
        }

        let (one, two) = cards.split_at(HAND_SIZE);
        Ok(Self {
            player_one: one.try_into().map_err(|_| ShowdownError::WrongCardCount {
                line,
                found: one.len(),
            })?,
            player_two: two.try_into().map_err(|_| ShowdownError::WrongCardCount {
                line,
                found: two.len(),
            })?,
        })
    }
}

/// Two hands reused across rounds.
#[derive(Debug, Default)]
pub struct Table {
    player_one: Hand,
    player_two: Hand,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, round: &Round) -> Result<Outcome, ShowdownError> {
        self.player_one.clear();
        self.player_two.clear();

        for (&one, &two) in round.player_one.iter().zip(&round.player_two) {
            self.player_one.add_card(one)?;
            self.player_two.add_card(two)?;
        }

        let outcome = match self.player_one.compare(&self.player_two)? {
            Ordering::Greater => Outcome::PlayerOne,
            Ordering::Less => Outcome::PlayerTwo,
            Ordering::Equal => Outcome::Tie,
        };

        debug!(
            player_one = %self.player_one,
            player_two = %self.player_two,
            ?outcome,
            "Round played"
        );
        Ok(outcome)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub rounds: usize,
    pub player_one_wins: usize,
    pub player_two_wins: usize,
    pub ties: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        self.rounds += 1;
        match outcome {
            Outcome::PlayerOne => self.player_one_wins += 1,
            Outcome::PlayerTwo => self.player_two_wins += 1,
            Outcome::Tie => self.ties += 1,
        }
    }
}

/// Plays every round in `reader`, skipping blank lines. Stops at the first bad line.
#[instrument(skip_all)]
pub fn play_rounds<R: BufRead>(reader: R) -> Result<Tally, ShowdownError> {
    let mut table = Table::new();
    let mut tally = Tally::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let round = Round::parse(index + 1, &line)?;
        tally.record(table.play(&round)?);
    }

    info!(
        rounds = tally.rounds,
        player_one_wins = tally.player_one_wins,
        player_two_wins = tally.player_two_wins,
        ties = tally.ties,
        "Showdown finished"
    );
    Ok(tally)
}
