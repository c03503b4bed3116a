use glam::{Mat4, Quat, Vec3};

/// Values that can be blended between two keyframes or two clips.
///
/// `interpolate(start, end, 0.0)` returns `start` and
/// `interpolate(start, end, 1.0)` returns `end` bit-for-bit, which keeps the
/// single-clip and blended playback paths in exact agreement at the ends of
/// a blend.
pub trait Interpolatable: Copy + Sized {
    /// Identity contribution used when a track carries no keys.
    const IDENTITY: Self;

    fn interpolate(start: Self, end: Self, factor: f32) -> Self;
}

impl Interpolatable for f32 {
    const IDENTITY: Self = 1.0;

    fn interpolate(start: Self, end: Self, factor: f32) -> Self {
        start * (1.0 - factor) + end * factor
    }
}

impl Interpolatable for Vec3 {
    const IDENTITY: Self = Vec3::ZERO;

    fn interpolate(start: Self, end: Self, factor: f32) -> Self {
        start * (1.0 - factor) + end * factor
    }
}

impl Interpolatable for Mat4 {
    const IDENTITY: Self = Mat4::IDENTITY;

    fn interpolate(start: Self, end: Self, factor: f32) -> Self {
        start * (1.0 - factor) + end * factor
    }
}

impl Interpolatable for Quat {
    const IDENTITY: Self = Quat::IDENTITY;

    /// Shortest-arc spherical interpolation, exact at both ends.
    fn interpolate(start: Self, end: Self, factor: f32) -> Self {
        if factor <= 0.0 {
            return start;
        }
        if factor >= 1.0 {
            return end;
        }
        start.slerp(end, factor)
    }
}

/// Free-function form of [`Interpolatable::interpolate`].
#[inline]
pub fn interpolate<T: Interpolatable>(start: T, end: T, factor: f32) -> T {
    T::interpolate(start, end, factor)
}
