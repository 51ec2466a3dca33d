//! Decoded mesh data.

use std::hash::BuildHasherDefault;
use std::ops::Range;

use hashbrown::HashSet;
use rustc_hash::FxHasher;

use crate::AnimationClip;

/// One interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Build a vertex from the 8 on-disk scalars.
    pub fn from_scalars(s: [f32; 8]) -> Self {
        Self {
            position: [s[0], s[1], s[2]],
            normal: [s[3], s[4], s[5]],
            uv: [s[6], s[7]],
        }
    }
}

/// Start of a span of indices sharing one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextureRun {
    /// Texture id, or [`TextureRun::UNTEXTURED`].
    pub texture_id: i32,
    /// Offset into the index list.
    pub start: u32,
}

impl TextureRun {
    /// Texture id of untextured geometry.
    pub const UNTEXTURED: i32 = -1;

    /// Whether this run references a texture.
    pub fn is_textured(&self) -> bool {
        self.texture_id >= 0
    }
}

/// A resolved texture run: the index range it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpan {
    pub texture_id: i32,
    pub indices: Range<usize>,
}

impl RunSpan {
    /// Whether this span references a texture.
    pub fn is_textured(&self) -> bool {
        self.texture_id >= 0
    }
}

/// Packed per-vertex skin influences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkinWeights {
    /// Four 8-bit bone indices, most significant byte first.
    pub bone_ids: u32,
    /// Four 8-bit weights in `0..=255`, same order as the ids.
    pub weights: u32,
}

impl SkinWeights {
    /// The four bone indices.
    pub fn bones(&self) -> [u8; 4] {
        self.bone_ids.to_be_bytes()
    }

    /// The four weights, normalized to `0.0..=1.0`.
    pub fn normalized_weights(&self) -> [f32; 4] {
        self.weights.to_be_bytes().map(|w| f32::from(w) / 255.0)
    }
}

/// One bone of a skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bone {
    /// Bind-pose transform, row-major.
    pub bind_matrix: [f32; 16],
    /// Parent index times [`Bone::PARENT_STRIDE`].
    pub parent_packed: i16,
    /// Auxiliary rest offset, in 1/1024 units.
    pub offset: [f32; 4],
}

impl Bone {
    /// Stride of the packed parent field.
    pub const PARENT_STRIDE: i16 = 0x40;

    /// Scale of the rest offsets.
    pub const OFFSET_SCALE: f32 = 1024.0;

    /// Parent bone index; 0 is the root.
    pub fn parent(&self) -> i32 {
        i32::from(self.parent_packed / Self::PARENT_STRIDE)
    }

    /// Rest-pose translation from the auxiliary offsets.
    pub fn rest_translation(&self) -> [f32; 3] {
        [
            self.offset[0] / Self::OFFSET_SCALE,
            self.offset[1] / Self::OFFSET_SCALE,
            self.offset[2] / Self::OFFSET_SCALE,
        ]
    }
}

/// A decoded mesh. Shared between every instance that places it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mesh {
    pub id: u32,
    /// Intrinsic scale applied to every position on export.
    pub size: f32,
    pub vertices: Vec<Vertex>,
    /// Triangle list, kept exactly as stored.
    pub indices: Vec<u16>,
    /// Sorted by `start`.
    pub texture_runs: Vec<TextureRun>,
    /// One entry per vertex when present.
    pub skin: Option<Vec<SkinWeights>>,
    pub bones: Vec<Bone>,
    pub animations: Vec<AnimationClip>,
}

impl Mesh {
    /// Whether the mesh has a skeleton to export.
    pub fn has_skeleton(&self) -> bool {
        !self.bones.is_empty()
    }

    /// Number of whole triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Partition the index list by texture run.
    ///
    /// Every index belongs to exactly one span. Indices before the first run
    /// (or all of them, without runs) form an untextured span; each run ends
    /// where the next begins and the last extends to the end. Empty spans are
    /// dropped.
    pub fn run_spans(&self) -> Vec<RunSpan> {
        let len = self.indices.len();
        let mut spans = Vec::with_capacity(self.texture_runs.len() + 1);

        let first = self
            .texture_runs
            .first()
            .map_or(len, |r| (r.start as usize).min(len));
        if first > 0 {
            spans.push(RunSpan {
                texture_id: TextureRun::UNTEXTURED,
                indices: 0..first,
            });
        }

        for (i, run) in self.texture_runs.iter().enumerate() {
            let start = (run.start as usize).min(len);
            let end = self
                .texture_runs
                .get(i + 1)
                .map_or(len, |next| (next.start as usize).clamp(start, len));
            if end > start {
                spans.push(RunSpan {
                    texture_id: run.texture_id,
                    indices: start..end,
                });
            }
        }

        spans
    }

    /// Distinct texture ids in first-seen order, untextured excluded.
    pub fn texture_ids(&self) -> Vec<i32> {
        let mut seen: HashSet<i32, BuildHasherDefault<FxHasher>> = HashSet::default();
        self.texture_runs
            .iter()
            .filter(|r| r.is_textured() && seen.insert(r.texture_id))
            .map(|r| r.texture_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_with_runs(index_count: usize, runs: &[(i32, u32)]) -> Mesh {
        Mesh {
            indices: (0..index_count as u16).collect(),
            texture_runs: runs
                .iter()
                .map(|&(texture_id, start)| TextureRun { texture_id, start })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_runs_partition_triangles() {
        let mesh = mesh_with_runs(90, &[(4, 0), (7, 30), (4, 60)]);
        let spans = mesh.run_spans();

        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].indices, 0..30);
        assert_eq!(spans[1].indices, 30..60);
        assert_eq!(spans[2].indices, 60..90);

        let mut covered = vec![0u32; mesh.triangle_count()];
        for span in &spans {
            assert_eq!(span.indices.start % 3, 0);
            assert_eq!(span.indices.end % 3, 0);
            for tri in span.indices.start / 3..span.indices.end / 3 {
                covered[tri] += 1;
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_no_runs_is_one_untextured_span() {
        let mesh = mesh_with_runs(9, &[]);
        assert_eq!(
            mesh.run_spans(),
            vec![RunSpan { texture_id: -1, indices: 0..9 }]
        );
    }

    #[test]
    fn test_leading_indices_are_untextured() {
        let mesh = mesh_with_runs(12, &[(2, 6)]);
        let spans = mesh.run_spans();
        assert_eq!(spans[0], RunSpan { texture_id: -1, indices: 0..6 });
        assert_eq!(spans[1], RunSpan { texture_id: 2, indices: 6..12 });
    }

    #[test]
    fn test_texture_ids_first_seen() {
        let mesh = mesh_with_runs(15, &[(9, 0), (-1, 3), (2, 6), (9, 9), (2, 12)]);
        assert_eq!(mesh.texture_ids(), vec![9, 2]);
    }

    #[test]
    fn test_skin_unpacking() {
        let skin = SkinWeights {
            bone_ids: 0x0102_0304,
            weights: 0xFF00_8000,
        };
        assert_eq!(skin.bones(), [1, 2, 3, 4]);
        let w = skin.normalized_weights();
        assert_eq!(w[0], 1.0);
        assert_eq!(w[1], 0.0);
        assert!((w[2] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_bone_parent() {
        let bone = Bone {
            bind_matrix: [0.0; 16],
            parent_packed: 3 * 0x40,
            offset: [1024.0, 2048.0, -512.0, 0.0],
        };
        assert_eq!(bone.parent(), 3);
        assert_eq!(bone.rest_translation(), [1.0, 2.0, -0.5]);
    }
}
