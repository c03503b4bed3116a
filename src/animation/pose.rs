use glam::{Mat4, Quat, Vec3};

use crate::animation::values::Interpolatable;

/// Local transform of one bone sampled from a clip.
///
/// Scale is uniform: the clip format stores a single scale factor per key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for BonePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BonePose {
    /// Zero translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quat, scale: f32) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Composes `T(translation) · R(rotation) · S(scale)`.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Blends each component independently; rotation uses slerp.
    #[must_use]
    pub fn blend(&self, other: &Self, weight: f32) -> Self {
        Self {
            translation: Vec3::interpolate(self.translation, other.translation, weight),
            rotation: Quat::interpolate(self.rotation, other.rotation, weight),
            scale: f32::interpolate(self.scale, other.scale, weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_pose_is_identity_matrix() {
        assert_eq!(BonePose::IDENTITY.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let pose = BonePose::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_z(FRAC_PI_2), 2.0);
        let p = pose.to_matrix().transform_point3(Vec3::X);
        // (1,0,0) * 2 -> rotate 90deg about Z -> (0,2,0) -> translate -> (1,2,0)
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn blend_endpoints_are_exact() {
        let a = BonePose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_x(0.4), 0.5);
        let b = BonePose::new(Vec3::new(-4.0, 0.0, 9.0), Quat::from_rotation_y(1.1), 3.0);
        assert_eq!(a.blend(&b, 0.0), a);
        assert_eq!(a.blend(&b, 1.0), b);
    }
}
