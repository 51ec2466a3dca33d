//! Error types for export operations.

use thiserror::Error;

use crate::CompositionMode;

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding error.
    #[error("{0}")]
    Engine(#[from] lombax_engine::Error),

    /// Out-of-range read in texture data.
    #[error("{0}")]
    Common(#[from] lombax_common::Error),

    /// The composition mode has no writer. Nothing was written.
    #[error("composition mode {0} is not supported")]
    UnsupportedCompositionMode(CompositionMode),

    /// Image encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Texture header doesn't describe a usable image.
    #[error("texture {id:#x}: {reason}")]
    InvalidTexture { id: u32, reason: &'static str },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, Error>;
