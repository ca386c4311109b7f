use std::path::PathBuf;

use strum_macros::{Display, EnumString};
use tracing::warn;

pub const DEFAULT_ROUNDS_PATH: &str = "p054_poker.txt";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Runtime configuration for the showdown binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowdownConfig {
    pub rounds_path: PathBuf,
    pub output: OutputFormat,
}

impl ShowdownConfig {
    /// Reads `SHOWDOWN_ROUNDS_PATH` and `SHOWDOWN_OUTPUT`, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("SHOWDOWN_ROUNDS_PATH").ok(),
            std::env::var("SHOWDOWN_OUTPUT").ok(),
        )
    }

    fn from_values(rounds_path: Option<String>, output: Option<String>) -> Self {
        let output = match output {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(output = %raw, "Unknown output format, using text");
                OutputFormat::default()
            }),
            None => OutputFormat::default(),
        };

        Self {
            rounds_path: rounds_path
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROUNDS_PATH)),
            output,
        }
    }

    /// A positional argument takes precedence over the environment
    pub fn with_path_arg(mut self, arg: Option<String>) -> Self {
        if let Some(path) = arg {
            self.rounds_path = PathBuf::from(path);
        }
        self
    }
}
