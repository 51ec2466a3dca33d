//! Fixed-stride on-disk records.
//!
//! All fields are big-endian; the structs are byte-aligned so they can be
//! read straight out of the container at any offset.

use zerocopy::byteorder::big_endian::{F32, I16, I32, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Read an array of big-endian floats.
#[inline]
pub(crate) fn floats<const N: usize>(raw: &[F32; N]) -> [f32; N] {
    raw.map(|v| v.get())
}

/// Mesh record header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct MeshHeader {
    pub id: U16,
    /// Bit 0: per-vertex skin data follows the indices.
    pub flags: U16,
    /// Intrinsic scale applied to every vertex position on export.
    pub size: F32,
    pub vertex_count: U32,
    pub index_count: U32,
    /// Relative to the record.
    pub payload_offset: U32,
    pub bone_count: U32,
    /// Relative to the record.
    pub skeleton_offset: U32,
    pub animation_count: U32,
    /// Relative to the record.
    pub animation_table_offset: U32,
}

impl MeshHeader {
    /// Skin flag bit.
    pub const HAS_SKIN: u16 = 0x0001;

    /// Whether per-vertex skin data is present.
    pub fn has_skin(&self) -> bool {
        self.flags.get() & Self::HAS_SKIN != 0
    }
}

/// Texture run inside a mesh payload.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct TextureRunRecord {
    pub texture_id: I32,
    pub start: U32,
}

/// Per-vertex packed bone ids and weights.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct SkinRecord {
    pub bone_ids: U32,
    pub weights: U32,
}

/// Bind-pose matrix with the packed parent index.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BoneMatrixRecord {
    /// Row-major 4x4.
    pub matrix: [F32; 16],
    pub reserved: I16,
    /// Parent index times [`crate::Bone::PARENT_STRIDE`].
    pub parent: I16,
}

/// Auxiliary per-bone offsets.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct BoneDataRecord {
    pub offset: [F32; 4],
}

/// `{id, mesh pointer}` pair in the moby and gadget tables.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ModelEntryRecord {
    pub id: U32,
    pub pointer: U32,
}

/// Placement of a tie, shrub or moby.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct InstanceRecord {
    pub model_id: U32,
    pub group: U32,
    pub position: [F32; 3],
    /// `x, y, z, w`
    pub rotation: [F32; 4],
    pub scale: [F32; 3],
    pub reserved: [U32; 4],
}

/// Texture header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct TextureRecord {
    pub vram_offset: U32,
    pub mip_count: U16,
    pub format: U16,
    pub width: U16,
    pub height: U16,
    pub vram_size: U32,
    pub reserved: [U32; 5],
}

/// Directional light pair.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct LightRecord {
    pub color_a: [F32; 4],
    pub direction_a: [F32; 4],
    pub color_b: [F32; 4],
    pub direction_b: [F32; 4],
}

/// Level-wide lighting and fog parameters.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct LightConfigRecord {
    pub ambient: [F32; 4],
    pub fog_color: [F32; 4],
    pub fog_near: F32,
    pub fog_far: F32,
    pub fog_near_intensity: F32,
    pub fog_far_intensity: F32,
}

/// Pointer/count pair of one terrain chunk.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct TerrainChunkRecord {
    pub fragments: U32,
    pub fragment_count: U32,
}

/// Terrain fragment with its culling sphere.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FragmentRecord {
    pub cull_center: [F32; 3],
    pub cull_radius: F32,
    pub mesh: U32,
    pub reserved: U32,
}

/// UI element header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct UiElementRecord {
    pub id: U16,
    pub sprite_count: U16,
    pub sprites: U32,
}
