//! Level objects other than meshes and textures.

use glam::{Quat, Vec3};

use crate::Mesh;

/// A directional light pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Light {
    pub color_a: [f32; 4],
    pub direction_a: [f32; 4],
    pub color_b: [f32; 4],
    pub direction_b: [f32; 4],
}

/// Level-wide ambient light and fog.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LightConfig {
    pub ambient: [f32; 4],
    pub fog_color: [f32; 4],
    pub fog_near: f32,
    pub fog_far: f32,
    pub fog_near_intensity: f32,
    pub fog_far_intensity: f32,
}

/// A UI element and the textures of its sprites.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UiElement {
    pub id: u16,
    pub sprites: Vec<u32>,
}

/// One piece of terrain with its culling sphere.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TerrainFragment {
    pub cull_center: [f32; 3],
    pub cull_radius: f32,
    pub mesh: Mesh,
}

/// A terrain chunk.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TerrainChunk {
    pub fragments: Vec<TerrainFragment>,
}

impl TerrainChunk {
    /// Chunks per level.
    pub const MAX: usize = 5;
}

/// A raw placement record, before its model id is resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placement {
    pub model_id: u32,
    pub group: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}
