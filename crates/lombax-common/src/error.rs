//! Error types for lombax-common.

use thiserror::Error;

/// Common error type for Lombax operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// An absolute block lies (partly) outside the source.
    #[error("block {offset:#x}+{len:#x} is outside a source of {size:#x} bytes")]
    OutOfBounds { offset: usize, len: usize, size: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
