//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a deal into an arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrangeError {
    /// Wrong number of cards entering the engine or wild resolution.
    #[error("expected {expected} cards, found {found}")]
    InvalidHandSize { expected: usize, found: usize },

    #[error("invalid card format: `{0}`")]
    InvalidCardFormat(String),

    /// The search finished but no triple satisfied every arrangement rule.
    #[error("no legal arrangement exists for this deal")]
    NoLegalArrangement,

    #[error("at most two wild cards are supported, found {0}")]
    TooManyWilds(usize),

    #[error("card id {0} appears more than once in the deal")]
    DuplicateCardId(u16),
}

/// Errors raised while loading a win-probability table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read probability table {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("probability table contains no usable rows")]
    Empty,
}

/// Errors raised while loading solver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
