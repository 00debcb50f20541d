//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid first index {0}: must be even and non-negative")]
    InvalidFirstIndex(i64),

    #[error("invalid chunk size {0}: must be even and non-zero")]
    InvalidSize(usize),

    #[error("requested chunk of size {size} but only supporting chunks of size up to {max}")]
    ChunkTooLarge { size: usize, max: usize },

    #[error("digit index {index} out of range [{first}, {last}]")]
    OutOfRange { index: i64, first: i64, last: i64 },

    #[error("invalid digit byte {byte:#04x} at position {position}")]
    InvalidDigit { byte: u8, position: i64 },

    #[error("invalid search pattern: {0:?}")]
    InvalidPattern(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
