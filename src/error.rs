//! Error types for loading, configuring and presenting rank runs

use linkrank_algorithms::EngineError;
use thiserror::Error;

/// Errors surfaced by a rank run
#[derive(Error, Debug)]
pub enum LinkRankError {
    /// A record could not be parsed into (id, neighbors)
    #[error("Malformed graph input at record {line}: {reason}")]
    MalformedGraphInput { line: usize, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration value rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Rank engine failure
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type LinkRankResult<T> = Result<T, LinkRankError>;
