//! Common utilities for Lombax.
//!
//! This crate provides the foundational pieces shared by the other Lombax crates:
//!
//! - [`BinaryReader`] - Bounds-checked, endian-aware reading from byte slices
//! - [`Error`] - The error raised when a read leaves the source

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::{BeReader, BinaryReader, LeReader};

/// Re-export byte order markers so callers don't need a direct `byteorder` dependency.
pub use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
