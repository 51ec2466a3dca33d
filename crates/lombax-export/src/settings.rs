//! Level export settings.

use std::fmt;
use std::str::FromStr;

use lombax_engine::{Category, TerrainChunk};

/// How level objects are grouped in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositionMode {
    /// One object holding everything.
    #[default]
    Combined,
    /// One object per placed instance.
    Separate,
    /// One object per category. Not supported.
    Typewise,
    /// One object per material. Not supported.
    Materialwise,
}

impl CompositionMode {
    pub const ALL: [CompositionMode; 4] = [
        CompositionMode::Combined,
        CompositionMode::Separate,
        CompositionMode::Typewise,
        CompositionMode::Materialwise,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            CompositionMode::Combined => "combined",
            CompositionMode::Separate => "separate",
            CompositionMode::Typewise => "typewise",
            CompositionMode::Materialwise => "materialwise",
        }
    }

    /// Whether the OBJ writer implements this mode.
    pub const fn is_supported(&self) -> bool {
        matches!(self, CompositionMode::Combined | CompositionMode::Separate)
    }
}

impl fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CompositionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompositionMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown composition mode: {s}"))
    }
}

/// What to export from a level and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelExportSettings {
    pub mode: CompositionMode,
    pub write_ties: bool,
    pub write_shrubs: bool,
    pub write_mobies: bool,
    pub chunks_selected: [bool; TerrainChunk::MAX],
    /// Write a sibling `.mtl` and reference it from the OBJ.
    pub export_material_file: bool,
}

impl Default for LevelExportSettings {
    fn default() -> Self {
        Self {
            mode: CompositionMode::Combined,
            write_ties: true,
            write_shrubs: true,
            write_mobies: true,
            chunks_selected: [true; TerrainChunk::MAX],
            export_material_file: true,
        }
    }
}

impl LevelExportSettings {
    /// Whether a category is exported.
    pub fn writes(&self, category: Category) -> bool {
        match category {
            Category::Tie => self.write_ties,
            Category::Shrub => self.write_shrubs,
            Category::Moby => self.write_mobies,
        }
    }

    /// Whether terrain chunk `index` is exported.
    pub fn chunk_selected(&self, index: usize) -> bool {
        self.chunks_selected.get(index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_export_everything() {
        let settings = LevelExportSettings::default();
        assert_eq!(settings.mode, CompositionMode::Combined);
        assert!(Category::ALL.iter().all(|&c| settings.writes(c)));
        assert!((0..5).all(|i| settings.chunk_selected(i)));
        assert!(!settings.chunk_selected(5));
        assert!(settings.export_material_file);
    }

    #[test]
    fn test_mode_names() {
        for mode in CompositionMode::ALL {
            assert_eq!(mode.name().parse::<CompositionMode>(), Ok(mode));
        }
        assert!("Combined".parse::<CompositionMode>().is_ok());
        assert!(!CompositionMode::Typewise.is_supported());
        assert!(!CompositionMode::Materialwise.is_supported());
    }
}
