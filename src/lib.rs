// Library crate for the five-card showdown ranker
// The binary and the integration tests go through this public API

pub mod cards;
pub mod config;
pub mod showdown;

// Re-export commonly used types for easier access in tests
pub use cards::{
    evaluate, Card, CardError, Hand, HandCategory, HandError, HandStrength, HandValue,
};
pub use config::{OutputFormat, ShowdownConfig};
pub use showdown::{play_rounds, Outcome, Round, ShowdownError, Table, Tally};
