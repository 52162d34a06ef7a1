//! Error types for the discourse decoder
//!
//! This module provides error handling using thiserror for structured
//! error definitions and anyhow for propagation at the binary boundary.

use thiserror::Error;

/// Main error type for decoding operations
#[derive(Error, Debug)]
pub enum DecoderError {
    /// A model lacks a capability the decoding step requires
    /// (e.g. probability output in joint mode)
    #[error("Capability error: {0}")]
    Capability(String),

    /// A structural decoder returned no prediction at all
    #[error("Decoder must make at least one prediction: {0}")]
    EmptyPrediction(String),

    /// Malformed or inconsistent datapack
    #[error("Datapack error: {0}")]
    Datapack(String),

    /// Label missing from the datapack's label list
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// A decode job failed or could not be joined
    #[error("Job error: {0}")]
    Job(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Convert anyhow::Error to DecoderError
impl From<anyhow::Error> for DecoderError {
    fn from(err: anyhow::Error) -> Self {
        DecoderError::Other(err.to_string())
    }
}
