//! Synthetic container builder for tests.

use crate::header::Slot;
use crate::{GameType, Section};

/// Builds a big-endian container: a zeroed header of the game's minimum
/// size followed by whatever the test appends.
pub(crate) struct ContainerBuilder {
    game: GameType,
    data: Vec<u8>,
}

/// A mesh to be written by [`ContainerBuilder::push_mesh`].
#[derive(Default)]
pub(crate) struct MeshSpec {
    pub id: u16,
    pub size: f32,
    pub runs: Vec<(i32, u32)>,
    /// `[x, y, z, nx, ny, nz, u, v]`
    pub vertices: Vec<[f32; 8]>,
    pub indices: Vec<u16>,
    pub skin: Option<Vec<(u32, u32)>>,
    /// `(row-major matrix, parent packed, offset)`
    pub bones: Vec<([f32; 16], i16, [f32; 4])>,
    /// Absolute clip pointers, 0 for an empty slot.
    pub clips: Vec<u32>,
}

impl MeshSpec {
    /// A mesh with `count` vertices at `(i, 0, 0)`, no indices.
    pub fn with_vertices(id: u16, count: usize) -> Self {
        Self {
            id,
            size: 1.0,
            vertices: (0..count)
                .map(|i| [i as f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0])
                .collect(),
            ..Default::default()
        }
    }
}

impl ContainerBuilder {
    pub fn new(game: GameType) -> Self {
        let mut data = vec![0u8; game.min_header_size()];
        data[GameType::TAG_OFFSET..GameType::TAG_OFFSET + 4].copy_from_slice(&game.num().to_be_bytes());
        Self { game, data }
    }

    pub fn here(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn align(&mut self, alignment: usize) {
        while self.data.len() % alignment != 0 {
            self.data.push(0);
        }
    }

    pub fn set_u32(&mut self, offset: usize, value: u32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    pub fn set_u16(&mut self, offset: usize, value: u16) {
        self.data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// Write a section's pointer and count into the header slots.
    ///
    /// Panics if the game's layout has no slot for a nonzero value.
    pub fn set_section(&mut self, section: Section, pointer: u32, count: u32) {
        let slots = self
            .game
            .layout()
            .slots
            .iter()
            .find(|(s, _, _)| *s == section)
            .map(|&(_, p, c)| (p, c));
        let (pointer_slot, count_slot) = slots.unwrap_or((Slot::Absent, Slot::Absent));

        for (slot, value) in [(pointer_slot, pointer), (count_slot, count)] {
            match slot {
                Slot::Absent => assert_eq!(value, 0, "{section} has no slot in {}", self.game),
                Slot::U16(offset) => self.set_u16(offset, value as u16),
                Slot::U32(offset) => self.set_u32(offset, value),
            }
        }
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) -> u32 {
        let at = self.here();
        self.data.extend_from_slice(bytes);
        at
    }

    pub fn push_u32(&mut self, value: u32) -> u32 {
        self.push_bytes(&value.to_be_bytes())
    }

    pub fn push_i32(&mut self, value: i32) -> u32 {
        self.push_bytes(&value.to_be_bytes())
    }

    pub fn push_u16(&mut self, value: u16) -> u32 {
        self.push_bytes(&value.to_be_bytes())
    }

    pub fn push_i16(&mut self, value: i16) -> u32 {
        self.push_bytes(&value.to_be_bytes())
    }

    pub fn push_f32(&mut self, value: f32) -> u32 {
        self.push_bytes(&value.to_be_bytes())
    }

    pub fn push_f32s(&mut self, values: &[f32]) -> u32 {
        let at = self.here();
        for &v in values {
            self.push_f32(v);
        }
        at
    }

    /// Append a 0x40-byte placement record.
    pub fn push_instance(&mut self, model_id: u32, position: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> u32 {
        let at = self.push_u32(model_id);
        self.push_u32(0);
        self.push_f32s(&position);
        self.push_f32s(&rotation);
        self.push_f32s(&scale);
        self.push_bytes(&[0; 16]);
        at
    }

    /// Append a clip: `frames` of `(rotations, translations)`.
    pub fn push_clip(&mut self, speed: f32, frames: &[(Vec<[i16; 4]>, Vec<[i16; 4]>)]) -> u32 {
        let at = self.push_f32(speed);
        self.push_u16(frames.len() as u16);
        self.push_u16(0);
        for (rotations, translations) in frames {
            self.push_u16(rotations.len() as u16);
            self.push_u16(translations.len() as u16);
            for v in rotations.iter().chain(translations) {
                for &c in v {
                    self.push_i16(c);
                }
            }
        }
        at
    }

    /// Append a mesh record and its payload, returning the record pointer.
    pub fn push_mesh(&mut self, mesh: &MeshSpec) -> u32 {
        self.align(4);
        let p = self.here();
        let header = p as usize;
        self.push_bytes(&[0; 0x24]);

        let payload = self.here();
        self.push_u32(mesh.runs.len() as u32);
        for &(texture_id, start) in &mesh.runs {
            self.push_i32(texture_id);
            self.push_u32(start);
        }
        for v in &mesh.vertices {
            self.push_f32s(v);
        }
        for &i in &mesh.indices {
            self.push_u16(i);
        }
        if let Some(skin) = &mesh.skin {
            for &(ids, weights) in skin {
                self.push_u32(ids);
                self.push_u32(weights);
            }
        }
        self.align(4);

        let skeleton = self.here();
        for (matrix, parent, _) in &mesh.bones {
            self.push_f32s(matrix);
            self.push_i16(0);
            self.push_i16(*parent);
        }
        for (_, _, offset) in &mesh.bones {
            self.push_f32s(offset);
        }

        let table = self.here();
        for &clip in &mesh.clips {
            self.push_u32(if clip == 0 { 0 } else { clip.wrapping_sub(p) });
        }

        self.set_u16(header, mesh.id);
        self.set_u16(header + 0x02, u16::from(mesh.skin.is_some()));
        self.data[header + 0x04..header + 0x08].copy_from_slice(&mesh.size.to_be_bytes());
        self.set_u32(header + 0x08, mesh.vertices.len() as u32);
        self.set_u32(header + 0x0C, mesh.indices.len() as u32);
        self.set_u32(header + 0x10, payload - p);
        self.set_u32(header + 0x14, mesh.bones.len() as u32);
        self.set_u32(header + 0x18, skeleton - p);
        self.set_u32(header + 0x1C, mesh.clips.len() as u32);
        self.set_u32(header + 0x20, table - p);
        p
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}
