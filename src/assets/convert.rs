//! Asset layout → engine math conversions.

use glam::{Mat4, Quat, Vec3};

use super::import::{AssetMatrix4, AssetQuaternion, AssetVector3};

impl From<AssetMatrix4> for Mat4 {
    /// Row-major container storage becomes column-major `Mat4`.
    fn from(m: AssetMatrix4) -> Self {
        Mat4::from_cols_array_2d(&m.rows()).transpose()
    }
}

impl From<Mat4> for AssetMatrix4 {
    fn from(m: Mat4) -> Self {
        AssetMatrix4::from_rows(m.transpose().to_cols_array_2d())
    }
}

impl From<AssetQuaternion> for Quat {
    fn from(q: AssetQuaternion) -> Self {
        Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl From<Quat> for AssetQuaternion {
    fn from(q: Quat) -> Self {
        AssetQuaternion {
            w: q.w,
            x: q.x,
            y: q.y,
            z: q.z,
        }
    }
}

impl From<AssetVector3> for Vec3 {
    fn from(v: AssetVector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for AssetVector3 {
    fn from(v: Vec3) -> Self {
        AssetVector3::new(v.x, v.y, v.z)
    }
}

/// Scaling keys collapse to the uniform scale the skeleton supports.
#[must_use]
pub fn uniform_scale(v: AssetVector3) -> f32 {
    v.x
}
