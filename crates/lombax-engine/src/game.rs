//! Container format versions.

use std::fmt;

use crate::error::HeaderFault;

/// The container format version, read from the first word of the header.
///
/// Each title ships its own header layout; see [`crate::PointerTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u32)]
pub enum GameType {
    /// First title.
    Rc1 = 1,
    /// Second title.
    Rc2 = 2,
    /// Third title.
    Rc3 = 3,
    /// Fourth title. No player animation section, 16-bit counts.
    Deadlocked = 4,
}

impl GameType {
    /// Offset of the game tag inside the header.
    pub const TAG_OFFSET: usize = 0x00;

    /// Get all known game types in tag order.
    pub const fn all() -> [GameType; 4] {
        [
            GameType::Rc1,
            GameType::Rc2,
            GameType::Rc3,
            GameType::Deadlocked,
        ]
    }

    /// The numeric tag stored in the header.
    pub const fn num(self) -> u32 {
        self as u32
    }

    /// Get the name of this game type.
    pub const fn name(&self) -> &'static str {
        match self {
            GameType::Rc1 => "Rc1",
            GameType::Rc2 => "Rc2",
            GameType::Rc3 => "Rc3",
            GameType::Deadlocked => "Deadlocked",
        }
    }

    /// Pointer value that marks a feature the title doesn't have, besides zero.
    pub const fn absent_sentinel(self) -> Option<u32> {
        match self {
            GameType::Deadlocked => Some(0xFFFF_FFFF),
            _ => None,
        }
    }
}

impl TryFrom<u32> for GameType {
    type Error = HeaderFault;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(GameType::Rc1),
            2 => Ok(GameType::Rc2),
            3 => Ok(GameType::Rc3),
            4 => Ok(GameType::Deadlocked),
            other => Err(HeaderFault::UnknownGameType(other)),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
