//! Opened engine containers.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::extract;
use crate::span::{self, SectionSpan};
use crate::{
    AnimationClip, GameType, Light, LightConfig, Mesh, Placement, PointerTable, Result, Section,
    SectionEntry, TerrainChunk, Texture, UiElement,
};

#[derive(Debug)]
enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Backing {
    fn bytes(&self) -> &[u8] {
        match self {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(data) => data.as_slice(),
        }
    }
}

/// An engine container with its decoded header.
///
/// Section accessors decode on demand and borrow nothing from the
/// container, so they can be called from several threads at once.
#[derive(Debug)]
pub struct EngineFile {
    backing: Backing,
    table: PointerTable,
}

impl EngineFile {
    /// Memory-map a container from disk and decode its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file)? };
        Self::with_backing(Backing::Mapped(mmap))
    }

    /// Decode a container held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::with_backing(Backing::Owned(data))
    }

    fn with_backing(backing: Backing) -> Result<Self> {
        let table = PointerTable::parse(backing.bytes())?;
        tracing::debug!(game = %table.game(), size = backing.bytes().len(), "decoded container header");
        Ok(Self { backing, table })
    }

    /// The raw container bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.backing.bytes()
    }

    #[inline]
    pub fn game(&self) -> GameType {
        self.table.game()
    }

    #[inline]
    pub fn pointer_table(&self) -> &PointerTable {
        &self.table
    }

    /// The section's entry with absent sections zeroed.
    fn entry(&self, section: Section) -> SectionEntry {
        self.table.locate(section).unwrap_or_default()
    }

    fn pointer(&self, section: Section) -> u32 {
        self.entry(section).pointer
    }

    pub fn tie_models(&self) -> Result<Vec<Mesh>> {
        extract::read_mesh_table(self.data(), self.entry(Section::TieModels))
    }

    pub fn shrub_models(&self) -> Result<Vec<Mesh>> {
        extract::read_mesh_table(self.data(), self.entry(Section::ShrubModels))
    }

    pub fn moby_models(&self) -> Result<Vec<Mesh>> {
        extract::read_moby_models(self.data(), self.pointer(Section::MobyModels))
    }

    pub fn gadget_models(&self) -> Result<Vec<Mesh>> {
        extract::read_gadget_models(self.data(), self.entry(Section::Gadgets))
    }

    pub fn skybox(&self) -> Result<Option<Mesh>> {
        extract::read_skybox(self.data(), self.pointer(Section::Skybox))
    }

    pub fn ties(&self) -> Result<Vec<Placement>> {
        extract::read_placements(self.data(), self.entry(Section::Ties))
    }

    pub fn shrubs(&self) -> Result<Vec<Placement>> {
        extract::read_placements(self.data(), self.entry(Section::Shrubs))
    }

    pub fn mobies(&self) -> Result<Vec<Placement>> {
        extract::read_placements(self.data(), self.entry(Section::Mobies))
    }

    pub fn terrain(&self) -> Result<Vec<TerrainChunk>> {
        extract::read_terrain(self.data(), self.pointer(Section::Terrain))
    }

    pub fn textures(&self) -> Result<Vec<Texture>> {
        extract::read_textures(self.data(), self.entry(Section::Textures))
    }

    pub fn texture_config_menu(&self) -> Result<Vec<i32>> {
        extract::read_texture_config_menu(self.data(), self.entry(Section::TextureConfigMenu))
    }

    /// Player clips. Always empty for Deadlocked.
    pub fn player_animations(&self) -> Result<Vec<AnimationClip>> {
        extract::read_player_animations(self.data(), self.pointer(Section::PlayerAnimations))
    }

    pub fn lights(&self) -> Result<Vec<Light>> {
        extract::read_lights(self.data(), self.entry(Section::Lights))
    }

    pub fn light_config(&self) -> Result<Option<LightConfig>> {
        extract::read_light_config(self.data(), self.pointer(Section::LightConfig))
    }

    pub fn ui_elements(&self) -> Result<Vec<UiElement>> {
        extract::read_ui_elements(self.data(), self.pointer(Section::UiElements))
    }

    /// Resolved span of a blob section, `None` for record sections.
    pub fn section_span(&self, section: Section) -> Result<Option<SectionSpan>> {
        span::resolve(&self.table, self.data(), section)
    }

    /// Bytes of a blob section; empty when absent or not a blob section.
    pub fn section_bytes(&self, section: Section) -> Result<&[u8]> {
        match self.section_span(section)? {
            Some(span) => span.slice(self.data()),
            None => Ok(&[]),
        }
    }

    pub fn render_defaults(&self) -> Result<&[u8]> {
        self.section_bytes(Section::RenderDefaults)
    }

    pub fn collision(&self) -> Result<&[u8]> {
        self.section_bytes(Section::Collision)
    }

    pub fn billboards(&self) -> Result<&[u8]> {
        self.section_bytes(Section::Billboards)
    }

    pub fn sound_config(&self) -> Result<&[u8]> {
        self.section_bytes(Section::SoundConfig)
    }
}
