//! Animation clips, keyframe sampling and playback control.
//!
//! - [`KeyframeTrack`]: one time-ordered track of values
//! - [`AnimationClip`]: named set of per-bone [`Channel`]s
//! - [`BonePose`]: sampled local transform of one bone
//! - [`PlaybackParameters`]: which clips to play and how
//! - [`PlaybackClock`]: advances playback time from frame deltas

pub mod values;
pub mod tracks;
pub mod clip;
pub mod pose;
pub mod params;
pub mod settings;
pub mod clock;

pub use values::Interpolatable;
pub use tracks::KeyframeTrack;
pub use clip::{AnimationClip, Channel};
pub use pose::BonePose;
pub use params::{BlendClips, PlaySingle, PlaybackMode, PlaybackParameters, TransitionClips};
pub use settings::{LoopMode, PlaybackSettings};
pub use clock::PlaybackClock;
