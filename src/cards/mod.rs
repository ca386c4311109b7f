pub mod basic;
pub mod hands;

#[cfg(test)]
mod tests;

pub use basic::{Card, CardError, Rank, Suit, RANK_SYMBOLS};
pub use hands::{
    evaluate, Hand, HandCategory, HandError, HandStrength, HandValue, HAND_SIZE,
};
