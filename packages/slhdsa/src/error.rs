//! Error types for the SLH-DSA crate

use std::fmt;
use thiserror::Error;

/// Result type alias for SLH-DSA operations
pub type Result<T> = std::result::Result<T, SlhDsaError>;

/// Main error type for key generation, signing and key decoding.
///
/// Verification never returns this type: every rejection collapses into a
/// plain `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlhDsaError {
    /// Unsupported or inconsistent parameter set
    #[error("invalid SLH-DSA parameter: {0}")]
    InvalidParameters(String),

    /// Input of the wrong size (seed, key, digest or randomizer)
    #[error("invalid {what} length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Which input was rejected
        what: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Length actually provided
        actual: usize,
    },

    /// Context string longer than 255 bytes
    #[error("context is larger than 255 bytes: {0}")]
    ContextTooLong(usize),

    /// Tree height or node index outside the parameter set's range
    #[error("invalid tree height or tree index: height {height}, index {index}")]
    InvalidTree {
        /// Requested node height
        height: u32,
        /// Requested node index
        index: u64,
    },

    /// The underlying hash function could not be keyed or written
    #[error("failed to write to a hash function: {0}")]
    Hash(String),

    /// Random number generation failed
    #[error("random generation failed: {0}")]
    RandomGenerationFailed(String),

    /// Malformed key encoding
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl SlhDsaError {
    /// Create an `InvalidParameters` error with a formatted message
    pub fn invalid_parameters(msg: impl fmt::Display) -> Self {
        Self::InvalidParameters(msg.to_string())
    }

    /// Create an `InvalidLength` error
    #[must_use]
    pub fn invalid_length(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            what,
            expected,
            actual,
        }
    }

    /// Create an `InvalidTree` error
    #[must_use]
    pub fn invalid_tree(height: u32, index: u64) -> Self {
        Self::InvalidTree { height, index }
    }

    /// Create a `Hash` error with a formatted message
    pub fn hash(msg: impl fmt::Display) -> Self {
        Self::Hash(msg.to_string())
    }

    /// Create a `RandomGenerationFailed` error with a formatted message
    pub fn random(msg: impl fmt::Display) -> Self {
        Self::RandomGenerationFailed(msg.to_string())
    }
}

impl From<hex::FromHexError> for SlhDsaError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidKey(format!("Hex decode error: {err}"))
    }
}
