//! Interchange output for decoded levels and meshes.
//!
//! - [`write_level_obj`] - A whole level as Wavefront OBJ + MTL
//! - [`write_mesh_obj`] - One mesh as OBJ + MTL
//! - [`write_mesh_iqe`] - One mesh with skeleton and animations as IQE
//! - [`TextureImages`] - Where texture images come from

mod error;
mod iqe;
mod images;
mod material;
mod obj;
mod settings;
mod transform;

pub use error::{Error, Result};
pub use images::{write_texture_image, RawVramImages, TextureImages, TextureSideChannel};
pub use iqe::{encode_iqe, write_mesh_iqe};
pub use material::{material_name, texture_file_name, MaterialLibrary};
pub use obj::{object_name, write_level_obj, write_mesh_obj, ExportSummary, ObjEncoder};
pub use settings::{CompositionMode, LevelExportSettings};
pub use transform::{rotate, VertexTransform};
