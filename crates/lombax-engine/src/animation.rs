//! Skeletal animation clips.

/// Quantization scale of rotation components.
pub const QUATERNION_SCALE: f32 = 32767.0;

/// Stride of the bone tag on translation entries.
pub const TRANSLATION_BONE_STRIDE: i16 = 0x100;

/// Convert a quantized quaternion to floats, `x, y, z, w` order.
#[inline]
pub fn dequantize(q: [i16; 4]) -> [f32; 4] {
    q.map(|c| f32::from(c) / QUATERNION_SCALE)
}

/// Translation delta for one bone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Translation {
    /// Raw `x, y, z, tag`; the tag carries the bone index.
    pub raw: [i16; 4],
}

impl Translation {
    /// Bone this delta applies to.
    pub fn bone(&self) -> i16 {
        self.raw[3] / TRANSLATION_BONE_STRIDE
    }
}

/// One keyframe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame {
    /// One quantized quaternion per bone, bind-pose order.
    pub rotations: Vec<[i16; 4]>,
    pub translations: Vec<Translation>,
}

impl Frame {
    /// Frames without rotations carry no animation data.
    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}

/// An animation clip.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimationClip {
    pub speed: f32,
    pub frames: Vec<Frame>,
}

impl AnimationClip {
    /// Base playback rate.
    pub const BASE_FRAMERATE: f32 = 60.0;

    /// Playback rate in frames per second.
    pub fn framerate(&self) -> f32 {
        Self::BASE_FRAMERATE * self.speed
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
