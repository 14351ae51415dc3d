//! Error types for the surfaces that parse external input.
//!
//! The simulation itself never fails: malformed genomes, impossible
//! separations and odd configuration values all degrade into valid state.
//! Only seed strings, hex genomes and configuration files can be rejected.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum SimError {
    /// Seed string is empty or not base-36.
    #[error("Invalid seed: {0:?}")]
    InvalidSeed(String),

    /// Genome text is not valid hex.
    #[error("Invalid genome hex: {0}")]
    InvalidGenomeHex(#[from] hex::FromHexError),

    /// Configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// File system errors
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, SimError>;
