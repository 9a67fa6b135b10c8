//! Error types for the transaction bot
//!
//! The classifier itself is total and never produces these. They come from
//! configuration loading, the ledger collaborator and the outer surfaces.

use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, CatatError>;

#[derive(Error, Debug)]
pub enum CatatError {

    // =============================
    // Configuration Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid lexicon: {0}")]
    Lexicon(String),

    // =============================
    // Collaborator Errors
    // =============================

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Invalid recap period: {0}")]
    InvalidPeriod(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
