use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::pose::BonePose;
use crate::animation::tracks::KeyframeTrack;
use crate::errors::{AnimationError, Result};

/// Keyframe tracks driving one bone, joined to the skeleton by name.
///
/// The three tracks are sampled independently and may have different lengths.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    pub bone_name: String,
    pub position: KeyframeTrack<Vec3>,
    pub rotation: KeyframeTrack<Quat>,
    pub scale: KeyframeTrack<f32>,
}

impl Channel {
    #[must_use]
    pub fn new(bone_name: impl Into<String>) -> Self {
        Self {
            bone_name: bone_name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_position(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.position = track;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, track: KeyframeTrack<Quat>) -> Self {
        self.rotation = track;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, track: KeyframeTrack<f32>) -> Self {
        self.scale = track;
        self
    }

    #[must_use]
    pub fn sample(&self, clip_time: f32) -> BonePose {
        BonePose {
            translation: self.position.sample(clip_time),
            rotation: self.rotation.sample(clip_time),
            scale: self.scale.sample(clip_time),
        }
    }
}

/// An immutable, named animation: one [`Channel`] per animated bone.
///
/// Clip-local time is measured in ticks; `ticks_per_second` converts to seconds.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    duration_ticks: f32,
    ticks_per_second: f32,
    total_seconds: f32,
    channels: Vec<Channel>,
    channel_lookup: FxHashMap<String, usize>,
}

impl AnimationClip {
    /// Builds a clip, rejecting durations or rates that would make time
    /// wrapping divide by zero.
    pub fn new(
        name: impl Into<String>,
        duration_ticks: f32,
        ticks_per_second: f32,
        channels: Vec<Channel>,
    ) -> Result<Self> {
        let name = name.into();

        if !duration_ticks.is_finite() || duration_ticks <= 0.0 {
            return Err(AnimationError::InvalidClip(format!(
                "clip '{name}' has non-positive duration {duration_ticks}"
            )));
        }
        if !ticks_per_second.is_finite() || ticks_per_second <= 0.0 {
            return Err(AnimationError::InvalidClip(format!(
                "clip '{name}' has non-positive playback rate {ticks_per_second}"
            )));
        }

        let mut channel_lookup = FxHashMap::default();
        for (index, channel) in channels.iter().enumerate() {
            if channel_lookup
                .insert(channel.bone_name.clone(), index)
                .is_some()
            {
                log::warn!(
                    "Clip '{name}' animates '{}' more than once, the last channel wins",
                    channel.bone_name
                );
            }
        }

        Ok(Self {
            total_seconds: duration_ticks / ticks_per_second,
            name,
            duration_ticks,
            ticks_per_second,
            channels,
            channel_lookup,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Duration in clip-local ticks.
    #[must_use]
    pub fn duration_ticks(&self) -> f32 {
        self.duration_ticks
    }

    /// Ticks per second.
    #[must_use]
    pub fn frame_rate(&self) -> f32 {
        self.ticks_per_second
    }

    #[must_use]
    pub fn total_seconds(&self) -> f32 {
        self.total_seconds
    }

    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    #[must_use]
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channel_lookup.get(name).map(|&i| &self.channels[i])
    }

    #[must_use]
    pub fn has_channel(&self, name: &str) -> bool {
        self.channel_lookup.contains_key(name)
    }

    /// Maps caller time to wrapped clip-local ticks in `[0, duration_ticks)`.
    ///
    /// Normalized time is a fraction of the clip; otherwise `time` is already in ticks.
    #[must_use]
    pub fn clip_time(&self, time: f32, normalized: bool) -> f32 {
        let ticks = if normalized {
            time * self.duration_ticks
        } else {
            time
        };
        let wrapped = ticks.rem_euclid(self.duration_ticks);
        // rem_euclid can round up to the divisor for tiny negative inputs
        if wrapped >= self.duration_ticks {
            0.0
        } else {
            wrapped
        }
    }

    /// Converts elapsed seconds into looping normalized time in `[0, 1)`.
    #[must_use]
    pub fn normalized_time(&self, seconds: f32) -> f32 {
        seconds.rem_euclid(self.total_seconds) / self.total_seconds
    }

    fn require_channel(&self, channel_name: &str) -> Result<&Channel> {
        self.channel(channel_name)
            .ok_or_else(|| AnimationError::MissingChannel {
                clip: self.name.clone(),
                channel: channel_name.to_string(),
            })
    }

    pub fn sample_position(&self, channel_name: &str, time: f32, normalized: bool) -> Result<Vec3> {
        let channel = self.require_channel(channel_name)?;
        Ok(channel.position.sample(self.clip_time(time, normalized)))
    }

    pub fn sample_rotation(&self, channel_name: &str, time: f32, normalized: bool) -> Result<Quat> {
        let channel = self.require_channel(channel_name)?;
        Ok(channel.rotation.sample(self.clip_time(time, normalized)))
    }

    pub fn sample_scale(&self, channel_name: &str, time: f32, normalized: bool) -> Result<f32> {
        let channel = self.require_channel(channel_name)?;
        Ok(channel.scale.sample(self.clip_time(time, normalized)))
    }

    /// Samples position, rotation and scale of one channel in a single lookup.
    pub fn sample_pose(&self, channel_name: &str, time: f32, normalized: bool) -> Result<BonePose> {
        let channel = self.require_channel(channel_name)?;
        Ok(channel.sample(self.clip_time(time, normalized)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn walk_clip() -> AnimationClip {
        let hips = Channel::new("hips").with_position(
            KeyframeTrack::new(
                vec![0.0, 10.0, 20.0],
                vec![Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 3.0, 0.0)],
            )
            .unwrap(),
        );
        AnimationClip::new("walk", 40.0, 20.0, vec![hips]).unwrap()
    }

    #[test]
    fn durations_and_rates() {
        let clip = walk_clip();
        assert_eq!(clip.name(), "walk");
        assert_eq!(clip.duration_ticks(), 40.0);
        assert_eq!(clip.frame_rate(), 20.0);
        assert!((clip.total_seconds() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn rejects_degenerate_clips() {
        assert!(matches!(
            AnimationClip::new("a", 10.0, 0.0, vec![]),
            Err(AnimationError::InvalidClip(_))
        ));
        assert!(matches!(
            AnimationClip::new("a", 0.0, 24.0, vec![]),
            Err(AnimationError::InvalidClip(_))
        ));
        assert!(AnimationClip::new("a", f32::NAN, 24.0, vec![]).is_err());
    }

    #[test]
    fn clip_time_wraps() {
        let clip = walk_clip();
        assert!((clip.clip_time(0.25, true) - 10.0).abs() < EPSILON);
        assert!((clip.clip_time(1.25, true) - 10.0).abs() < EPSILON);
        assert!((clip.clip_time(50.0, false) - 10.0).abs() < EPSILON);
        assert!((clip.clip_time(-30.0, false) - 10.0).abs() < EPSILON);
        assert!(clip.clip_time(1.0, true) < clip.duration_ticks());
    }

    #[test]
    fn normalized_time_from_seconds() {
        let clip = walk_clip();
        assert!((clip.normalized_time(0.5) - 0.25).abs() < EPSILON);
        assert!((clip.normalized_time(2.5) - 0.25).abs() < EPSILON);
    }

    #[test]
    fn missing_channel_is_reported() {
        let clip = walk_clip();
        let err = clip.sample_position("tail", 0.0, true).unwrap_err();
        assert_eq!(
            err,
            AnimationError::MissingChannel {
                clip: "walk".into(),
                channel: "tail".into()
            }
        );
        assert!(clip.sample_rotation("tail", 0.0, true).is_err());
        assert!(clip.sample_scale("tail", 0.0, true).is_err());
    }

    #[test]
    fn unkeyed_tracks_sample_identity() {
        let clip = walk_clip();
        assert_eq!(clip.sample_rotation("hips", 0.3, true).unwrap(), Quat::IDENTITY);
        assert_eq!(clip.sample_scale("hips", 0.3, true).unwrap(), 1.0);
    }

    #[test]
    fn past_last_key_holds_last_value() {
        let clip = walk_clip();
        // 30 ticks is after the last key (20) but inside the clip (40)
        let p = clip.sample_position("hips", 30.0, false).unwrap();
        assert!((p.y - 3.0).abs() < EPSILON);
    }

    #[test]
    fn sample_pose_matches_individual_samplers() {
        let clip = walk_clip();
        let pose = clip.sample_pose("hips", 0.375, true).unwrap();
        assert_eq!(pose.translation, clip.sample_position("hips", 0.375, true).unwrap());
        assert_eq!(pose.rotation, clip.sample_rotation("hips", 0.375, true).unwrap());
        assert_eq!(pose.scale, clip.sample_scale("hips", 0.375, true).unwrap());
    }

    #[test]
    fn duplicate_channels_last_wins() {
        let a = Channel::new("hips");
        let b = Channel::new("hips").with_scale(KeyframeTrack::new(vec![0.0], vec![2.0]).unwrap());
        let clip = AnimationClip::new("dup", 1.0, 1.0, vec![a, b]).unwrap();
        assert_eq!(clip.sample_scale("hips", 0.0, true).unwrap(), 2.0);
    }
}
