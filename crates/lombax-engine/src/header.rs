//! Container header decoding.
//!
//! The header is a flat table of big-endian pointers and counts. Which
//! word holds which section depends on the [`GameType`] tag at offset 0,
//! so each game type maps to a static [`HeaderLayout`] and the decoder just
//! walks the slots of the selected layout.

use std::fmt;

use lombax_common::BeReader;

use crate::error::HeaderFault;
use crate::{GameType, Result};

/// Every section kind the header can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Section {
    MobyModels,
    RenderDefaults,
    Skybox,
    Collision,
    PlayerAnimations,
    TieModels,
    Ties,
    ShrubModels,
    Shrubs,
    Mobies,
    Terrain,
    Textures,
    Lights,
    LightConfig,
    TextureConfigMenu,
    /// Texture-2d (billboard) data.
    Billboards,
    SoundConfig,
    UiElements,
    Gadgets,
}

impl Section {
    /// Number of section kinds.
    pub const COUNT: usize = 19;

    /// All section kinds in table order.
    pub const ALL: [Section; Section::COUNT] = [
        Section::MobyModels,
        Section::RenderDefaults,
        Section::Skybox,
        Section::Collision,
        Section::PlayerAnimations,
        Section::TieModels,
        Section::Ties,
        Section::ShrubModels,
        Section::Shrubs,
        Section::Mobies,
        Section::Terrain,
        Section::Textures,
        Section::Lights,
        Section::LightConfig,
        Section::TextureConfigMenu,
        Section::Billboards,
        Section::SoundConfig,
        Section::UiElements,
        Section::Gadgets,
    ];

    /// Get the name of this section.
    pub const fn name(&self) -> &'static str {
        match self {
            Section::MobyModels => "moby-models",
            Section::RenderDefaults => "render-defaults",
            Section::Skybox => "skybox",
            Section::Collision => "collision",
            Section::PlayerAnimations => "player-animations",
            Section::TieModels => "tie-models",
            Section::Ties => "ties",
            Section::ShrubModels => "shrub-models",
            Section::Shrubs => "shrubs",
            Section::Mobies => "mobies",
            Section::Terrain => "terrain",
            Section::Textures => "textures",
            Section::Lights => "lights",
            Section::LightConfig => "light-config",
            Section::TextureConfigMenu => "texture-config-menu",
            Section::Billboards => "billboards",
            Section::SoundConfig => "sound-config",
            Section::UiElements => "ui-elements",
            Section::Gadgets => "gadgets",
        }
    }

    /// Look a section up by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.name() == name)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw pointer/count pair for one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionEntry {
    /// Absolute byte offset of the section.
    pub pointer: u32,
    /// Record count, or 0 for sections that don't store one.
    pub count: u32,
}

/// Where a header word lives and how wide it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Absent,
    U16(usize),
    U32(usize),
}

impl Slot {
    fn read(self, reader: &BeReader<'_>) -> Result<u32> {
        Ok(match self {
            Slot::Absent => 0,
            Slot::U16(offset) => u32::from(reader.u16_at(offset)?),
            Slot::U32(offset) => reader.u32_at(offset)?,
        })
    }
}

/// Header layout of one game type.
#[derive(Debug)]
pub(crate) struct HeaderLayout {
    pub(crate) min_size: usize,
    /// `(section, pointer slot, count slot)`; sections missing here are absent.
    pub(crate) slots: &'static [(Section, Slot, Slot)],
}

use Slot::{Absent, U16, U32};

const RC1_LAYOUT: HeaderLayout = HeaderLayout {
    min_size: 0x74,
    slots: &[
        (Section::MobyModels, U32(0x04), Absent),
        (Section::RenderDefaults, U32(0x08), Absent),
        (Section::Skybox, U32(0x0C), Absent),
        (Section::Collision, U32(0x10), Absent),
        (Section::PlayerAnimations, U32(0x14), Absent),
        (Section::TieModels, U32(0x18), U32(0x1C)),
        (Section::Ties, U32(0x20), U32(0x24)),
        (Section::ShrubModels, U32(0x28), U32(0x2C)),
        (Section::Shrubs, U32(0x30), U32(0x34)),
        (Section::Terrain, U32(0x38), Absent),
        (Section::Textures, U32(0x3C), U32(0x40)),
        (Section::Lights, U32(0x44), U32(0x48)),
        (Section::LightConfig, U32(0x4C), Absent),
        (Section::TextureConfigMenu, U32(0x50), U32(0x54)),
        (Section::Billboards, U32(0x58), Absent),
        (Section::SoundConfig, U32(0x5C), Absent),
        (Section::UiElements, U32(0x60), Absent),
        (Section::Gadgets, U32(0x64), U32(0x68)),
        (Section::Mobies, U32(0x6C), U32(0x70)),
    ],
};

const RC23_LAYOUT: HeaderLayout = HeaderLayout {
    min_size: 0x74,
    slots: &[
        (Section::MobyModels, U32(0x04), Absent),
        (Section::RenderDefaults, U32(0x08), Absent),
        (Section::Collision, U32(0x0C), Absent),
        (Section::Skybox, U32(0x10), Absent),
        (Section::PlayerAnimations, U32(0x14), Absent),
        (Section::Terrain, U32(0x18), Absent),
        (Section::TieModels, U32(0x1C), U32(0x20)),
        (Section::Ties, U32(0x24), U32(0x28)),
        (Section::ShrubModels, U32(0x2C), U32(0x30)),
        (Section::Shrubs, U32(0x34), U32(0x38)),
        (Section::Mobies, U32(0x3C), U32(0x40)),
        (Section::Textures, U32(0x44), U32(0x48)),
        (Section::Billboards, U32(0x4C), Absent),
        (Section::SoundConfig, U32(0x50), Absent),
        (Section::Lights, U32(0x54), U32(0x58)),
        (Section::LightConfig, U32(0x5C), Absent),
        (Section::TextureConfigMenu, U32(0x64), U32(0x60)),
        (Section::UiElements, U32(0x68), Absent),
        (Section::Gadgets, U32(0x70), U32(0x6C)),
    ],
};

// Deadlocked packs its counts into 16-bit words and has no player animations.
const DEADLOCKED_LAYOUT: HeaderLayout = HeaderLayout {
    min_size: 0x60,
    slots: &[
        (Section::MobyModels, U32(0x04), Absent),
        (Section::RenderDefaults, U32(0x08), Absent),
        (Section::Collision, U32(0x0C), Absent),
        (Section::Skybox, U32(0x10), Absent),
        (Section::Terrain, U32(0x14), Absent),
        (Section::TieModels, U32(0x18), U16(0x1C)),
        (Section::ShrubModels, U32(0x20), U16(0x1E)),
        (Section::Ties, U32(0x24), U16(0x2C)),
        (Section::Shrubs, U32(0x28), U16(0x2E)),
        (Section::Mobies, U32(0x30), U16(0x34)),
        (Section::Textures, U32(0x38), U16(0x36)),
        (Section::Billboards, U32(0x3C), Absent),
        (Section::SoundConfig, U32(0x40), Absent),
        (Section::Lights, U32(0x44), U16(0x48)),
        (Section::TextureConfigMenu, U32(0x50), U16(0x4A)),
        (Section::LightConfig, U32(0x4C), Absent),
        (Section::UiElements, U32(0x54), Absent),
        (Section::Gadgets, U32(0x58), U16(0x5C)),
    ],
};

impl GameType {
    pub(crate) const fn layout(self) -> &'static HeaderLayout {
        match self {
            GameType::Rc1 => &RC1_LAYOUT,
            GameType::Rc2 | GameType::Rc3 => &RC23_LAYOUT,
            GameType::Deadlocked => &DEADLOCKED_LAYOUT,
        }
    }

    /// Minimum number of bytes a container of this type must have.
    pub const fn min_header_size(self) -> usize {
        self.layout().min_size
    }
}

/// Decoded container header: where every section lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTable {
    game: GameType,
    entries: [SectionEntry; Section::COUNT],
}

impl PointerTable {
    /// Decode the header at the start of `data`.
    ///
    /// Fails if the source is too short for the detected game type or the
    /// game tag is unknown. Pointer values themselves are not validated.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let reader = BeReader::new(data);
        let tag = reader
            .u32_at(GameType::TAG_OFFSET)
            .map_err(|_| HeaderFault::MissingTag {
                available: data.len(),
            })?;
        let game = GameType::try_from(tag)?;

        let layout = game.layout();
        if data.len() < layout.min_size {
            return Err(HeaderFault::TooShort {
                game,
                needed: layout.min_size,
                available: data.len(),
            }
            .into());
        }

        let mut entries = [SectionEntry::default(); Section::COUNT];
        for &(section, pointer, count) in layout.slots {
            entries[section.index()] = SectionEntry {
                pointer: pointer.read(&reader)?,
                count: count.read(&reader)?,
            };
        }

        Ok(Self { game, entries })
    }

    /// The container's game type.
    pub fn game(&self) -> GameType {
        self.game
    }

    /// The raw pointer/count pair, exactly as stored.
    pub fn entry(&self, section: Section) -> SectionEntry {
        self.entries[section.index()]
    }

    /// Whether the section is absent (zero pointer or the game's sentinel).
    pub fn is_absent(&self, section: Section) -> bool {
        let pointer = self.entry(section).pointer;
        pointer == 0 || Some(pointer) == self.game.absent_sentinel()
    }

    /// The section's pointer/count, or `None` when the section is absent.
    pub fn locate(&self, section: Section) -> Option<SectionEntry> {
        (!self.is_absent(section)).then(|| self.entry(section))
    }

    /// Iterate over all sections with their raw entries.
    pub fn iter(&self) -> impl Iterator<Item = (Section, SectionEntry)> + '_ {
        Section::ALL.into_iter().map(move |s| (s, self.entry(s)))
    }
}
