//! Lombax - engine container decoding and level export library.
//!
//! This crate provides a unified interface to the Lombax library crates.
//!
//! # Crates
//!
//! - [`lombax_common`] - Bounds-checked binary reading
//! - [`lombax_engine`] - Container header, section extractors, level assembly
//! - [`lombax_export`] - OBJ/MTL and IQE writers
//!
//! # Example
//!
//! ```no_run
//! use lombax::prelude::*;
//! use std::path::Path;
//!
//! let file = EngineFile::open("engine.ps3")?;
//! let level = Level::load(&file)?;
//!
//! write_level_obj(&level, Path::new("level.obj"), &LevelExportSettings::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use lombax_common as common;
pub use lombax_engine as engine;
pub use lombax_export as export;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use lombax_common::BeReader;
    pub use lombax_engine::{
        Category, EngineFile, GameType, Level, Mesh, PointerTable, Section, Texture,
    };
    pub use lombax_export::{
        write_level_obj, write_mesh_iqe, write_mesh_obj, CompositionMode, LevelExportSettings,
        RawVramImages, TextureImages, TextureSideChannel,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
