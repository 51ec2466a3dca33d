//! Section extractors.
//!
//! Each extractor is a plain function over the shared byte source. They
//! share no state, so a level's sections can be decoded in any order or in
//! parallel. A zero pointer always yields an empty result; the caller maps
//! the game's absent sentinel to zero via [`crate::PointerTable::locate`].

mod animations;
mod instances;
mod lights;
mod models;
mod terrain;
mod textures;
mod ui;

pub use animations::{read_clip, read_player_animations};
pub use instances::read_placements;
pub use lights::{read_light_config, read_lights};
pub use models::{read_gadget_models, read_mesh, read_mesh_table, read_moby_models, read_skybox};
pub use terrain::read_terrain;
pub use textures::{read_texture_config_menu, read_textures};
pub use ui::read_ui_elements;
