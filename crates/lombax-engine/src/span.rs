//! Lengths of sections that don't store one.
//!
//! Some sections are opaque blobs whose size has to be derived: either from
//! the pointer of the section that follows them in the file, or from a small
//! sub-header at the start of the section itself.

use lombax_common::BeReader;

use crate::{Error, PointerTable, Result, Section};

/// How a blob section's length is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthStrategy {
    /// The section ends where `next` begins.
    Gap { next: Section },
    /// An 8-byte `{relative start, payload length}` block sits at the pointer.
    EmbeddedHeader,
}

impl Section {
    /// The length strategy for blob sections, `None` for record sections.
    pub const fn length_strategy(self) -> Option<LengthStrategy> {
        match self {
            Section::RenderDefaults => Some(LengthStrategy::Gap {
                next: Section::Collision,
            }),
            Section::Billboards => Some(LengthStrategy::Gap {
                next: Section::SoundConfig,
            }),
            Section::SoundConfig => Some(LengthStrategy::Gap {
                next: Section::Lights,
            }),
            Section::Collision => Some(LengthStrategy::EmbeddedHeader),
            _ => None,
        }
    }
}

/// A resolved byte range inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub start: u32,
    pub len: u32,
}

impl SectionSpan {
    /// An empty span, used for absent sections.
    pub const EMPTY: SectionSpan = SectionSpan { start: 0, len: 0 };

    /// Borrow the spanned bytes.
    pub fn slice<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        if self.len == 0 {
            return Ok(&[]);
        }
        Ok(BeReader::new(data).block(self.start as usize, self.len as usize)?)
    }
}

fn checked_len(section: Section, pointer: u32, length: i64) -> Result<u32> {
    u32::try_from(length).map_err(|_| Error::InvalidSectionLength {
        section,
        pointer,
        length,
    })
}

/// Gap strategy: the section runs up to `next`.
///
/// The caller supplies the neighbour; nothing is searched for.
pub fn gap_length(section: Section, pointer: u32, next: u32) -> Result<u32> {
    checked_len(section, pointer, i64::from(next) - i64::from(pointer))
}

/// Embedded sub-header strategy: total span from the pointer to the end of
/// the payload the sub-header declares.
pub fn subheader_length(data: &[u8], section: Section, pointer: u32) -> Result<u32> {
    let reader = BeReader::new(data);
    let relative_start = reader.i32_at(pointer as usize)?;
    let payload_len = reader.i32_at(pointer as usize + 4)?;

    // (pointer + relative_start + payload_len) - pointer
    let length = i64::from(relative_start) + i64::from(payload_len);
    checked_len(section, pointer, length)
}

/// Resolve the span of a blob section. Absent sections resolve to
/// [`SectionSpan::EMPTY`]; record sections resolve to `None`.
pub fn resolve(table: &PointerTable, data: &[u8], section: Section) -> Result<Option<SectionSpan>> {
    let Some(strategy) = section.length_strategy() else {
        return Ok(None);
    };
    let Some(entry) = table.locate(section) else {
        return Ok(Some(SectionSpan::EMPTY));
    };

    let len = match strategy {
        LengthStrategy::Gap { next } => {
            gap_length(section, entry.pointer, table.entry(next).pointer)?
        }
        LengthStrategy::EmbeddedHeader => subheader_length(data, section, entry.pointer)?,
    };

    Ok(Some(SectionSpan {
        start: entry.pointer,
        len,
    }))
}
