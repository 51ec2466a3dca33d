//! Error types for engine container decoding.

use thiserror::Error;

use crate::{GameType, Section};

/// Errors that can occur while decoding an engine container.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (out-of-range read).
    #[error("{0}")]
    Common(#[from] lombax_common::Error),

    /// The header could not be decoded. Nothing is returned.
    #[error("malformed header: {0}")]
    MalformedHeader(HeaderFault),

    /// A derived section length came out negative.
    #[error("invalid length for section {section}: pointer {pointer:#x}, length {length}")]
    InvalidSectionLength {
        section: Section,
        pointer: u32,
        length: i64,
    },
}

/// Why a header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderFault {
    /// The source ends before the header does.
    #[error("{game} header needs {needed} bytes but the source has {available}")]
    TooShort {
        game: GameType,
        needed: usize,
        available: usize,
    },

    /// The source is too short to even hold the game tag.
    #[error("source of {available} bytes has no game tag")]
    MissingTag { available: usize },

    /// The game tag is not one of the known values.
    #[error("unknown game type {0}")]
    UnknownGameType(u32),
}

impl From<HeaderFault> for Error {
    fn from(fault: HeaderFault) -> Self {
        Error::MalformedHeader(fault)
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
