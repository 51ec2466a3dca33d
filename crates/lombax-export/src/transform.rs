//! Placement transforms.

use glam::{Quat, Vec3};
use lombax_engine::PlacementInstance;

/// Rotate `v` by `q`: `2(u·v)u + (s² - |u|²)v + 2s(u × v)`, where `u` is
/// the vector part and `s` the scalar part of `q`.
#[inline]
pub fn rotate(q: Quat, v: Vec3) -> Vec3 {
    let u = Vec3::new(q.x, q.y, q.z);
    let s = q.w;
    2.0 * u.dot(v) * u + (s * s - u.dot(u)) * v + 2.0 * s * u.cross(v)
}

/// How positions are placed in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexTransform {
    /// Positions are written as stored.
    Identity,
    /// `rotate(rotation, size * scale * p) + position`.
    Placed {
        size: f32,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    },
}

impl VertexTransform {
    /// Transform for an instance of a mesh with intrinsic `size`.
    pub fn placed(size: f32, instance: &PlacementInstance) -> Self {
        VertexTransform::Placed {
            size,
            position: instance.position,
            rotation: instance.rotation,
            scale: instance.scale,
        }
    }

    #[inline]
    pub fn apply(&self, p: [f32; 3]) -> Vec3 {
        let p = Vec3::from_array(p);
        match *self {
            VertexTransform::Identity => p,
            VertexTransform::Placed {
                size,
                position,
                rotation,
                scale,
            } => rotate(rotation, size * scale * p) + position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rotation() {
        let v = Vec3::new(1.5, -2.0, 3.25);
        assert_eq!(rotate(Quat::IDENTITY, v), v);
    }

    #[test]
    fn test_matches_quaternion_rotation() {
        let q = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(rotate(q, v).abs_diff_eq(q * v, 1e-5));
    }

    #[test]
    fn test_placed() {
        let instance = PlacementInstance {
            model: 0,
            group: 0,
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::new(1.0, 2.0, 3.0),
        };
        let t = VertexTransform::placed(0.5, &instance);
        assert_eq!(t.apply([2.0, 2.0, 2.0]), Vec3::new(11.0, 2.0, 3.0));
        assert_eq!(VertexTransform::Identity.apply([2.0, 2.0, 2.0]), Vec3::splat(2.0));
    }
}
