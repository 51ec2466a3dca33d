//! Engine container decoding.
//!
//! An engine container is a big-endian blob that starts with a game tag and
//! a table of absolute section pointers. This crate provides:
//!
//! - [`PointerTable`] - Header decoding, one static layout per [`GameType`]
//! - [`span`] - Lengths of blob sections that don't store one
//! - [`extract`] - Typed readers for every section kind
//! - [`EngineFile`] - A memory-mapped container with per-section accessors
//! - [`Level`] - Every section decoded and placements resolved
//!
//! # Example
//!
//! ```no_run
//! use lombax_engine::{EngineFile, Level};
//!
//! let file = EngineFile::open("engine.ps3")?;
//! let level = Level::load(&file)?;
//! println!("{} ties, {} textures", level.ties.len(), level.textures.len());
//! # Ok::<(), lombax_engine::Error>(())
//! ```

mod animation;
mod engine;
mod error;
pub mod extract;
mod game;
mod header;
mod level;
mod mesh;
mod objects;
mod records;
pub mod span;
mod texture;

#[cfg(test)]
pub(crate) mod test_support;

pub use animation::{dequantize, AnimationClip, Frame, Translation, QUATERNION_SCALE};
pub use engine::EngineFile;
pub use error::{Error, HeaderFault, Result};
pub use game::GameType;
pub use header::{PointerTable, Section, SectionEntry};
pub use level::{Category, Level, PlacementInstance};
pub use mesh::{Bone, Mesh, RunSpan, SkinWeights, TextureRun, Vertex};
pub use objects::{Light, LightConfig, Placement, TerrainChunk, TerrainFragment, UiElement};
pub use span::{LengthStrategy, SectionSpan};
pub use texture::Texture;
