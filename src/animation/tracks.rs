use crate::animation::values::Interpolatable;
use crate::errors::{AnimationError, Result};

/// A single time-ordered keyframe track.
///
/// `times` and `values` are parallel arrays; `times` is non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub(crate) times: Vec<f32>,
    pub(crate) values: Vec<T>,
}

impl<T: Interpolatable> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Creates a track from parallel time/value arrays.
    ///
    /// Fails if the lengths differ or the times are not sorted.
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Result<Self> {
        if times.len() != values.len() {
            return Err(AnimationError::InvalidClip(format!(
                "keyframe track has {} timestamps but {} values",
                times.len(),
                values.len()
            )));
        }
        if let Some(i) = times.windows(2).position(|w| w[0] > w[1] || w[0].is_nan() || w[1].is_nan()) {
            return Err(AnimationError::InvalidClip(format!(
                "keyframe times are not sorted at key {} ({} > {})",
                i + 1,
                times[i],
                times[i + 1]
            )));
        }
        Ok(Self { times, values })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a track from `(time, value)` pairs.
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, T)>) -> Result<Self> {
        let (times, values): (Vec<f32>, Vec<T>) = keys.into_iter().unzip();
        Self::new(times, values)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Samples the track at clip-local `time`.
    ///
    /// - no keys: the identity value of `T`
    /// - one key: that key's value
    /// - otherwise: interpolation between the bracketing keys, clamped to the
    ///   first/last key outside the keyed range
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        match self.times.len() {
            0 => T::IDENTITY,
            1 => self.values[0],
            len => {
                // First index whose time is > `time`; the key before it starts the segment.
                let next_idx = self.times.partition_point(|&t| t <= time);
                if next_idx >= len {
                    return self.values[len - 1];
                }
                let index = next_idx.saturating_sub(1);
                self.sample_segment(index, time)
            }
        }
    }

    fn sample_segment(&self, index: usize, time: f32) -> T {
        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        // Coincident keys: take the earlier one instead of dividing by zero
        let factor = if dt > f32::EPSILON { (time - t0) / dt } else { 0.0 };

        T::interpolate(
            self.values[index],
            self.values[next_idx],
            factor.clamp(0.0, 1.0),
        )
    }
}
