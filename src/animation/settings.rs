//! Playback Settings
//!
//! Configuration for how a [`PlaybackClock`](super::clock::PlaybackClock)
//! advances through a clip.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_skeletal::animation::{LoopMode, PlaybackSettings};
//!
//! // Default: real-time, looping forever
//! let settings = PlaybackSettings::default();
//!
//! // Half speed, stop on the last frame
//! let settings = PlaybackSettings {
//!     time_scale: 0.5,
//!     loop_mode: LoopMode::Once,
//! };
//! ```

/// What happens when playback reaches the end of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Stop at the end and pause.
    Once,
    /// Wrap back to the start.
    #[default]
    Loop,
    /// Alternate forward and backward.
    PingPong,
}

/// Playback speed and looping behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    /// Multiplier applied to frame delta time. `1.0` is real time.
    pub time_scale: f32,
    pub loop_mode: LoopMode,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            loop_mode: LoopMode::Loop,
        }
    }
}
