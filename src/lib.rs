#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Skeletal animation evaluation: keyframe clips, bone hierarchies and
//! per-frame skinning matrices.
//!
//! ```rust,ignore
//! use myth_skeletal::{AnimatedModel, PlaybackParameters, PlaySingle};
//!
//! let mut model = AnimatedModel::from_scene(&imported)?;
//! let bones = model.play(&PlaybackParameters::Single(PlaySingle {
//!     clip: 0,
//!     normalized_time: 0.25,
//! }))?;
//! queue.write_buffer(&bone_buffer, 0, bytemuck::cast_slice(bones));
//! ```

pub mod errors;
pub mod animation;
pub mod scene;
pub mod assets;

pub use errors::{AnimationError, Result};
pub use animation::{
    AnimationClip, BlendClips, BonePose, Channel, KeyframeTrack, LoopMode, PlaySingle,
    PlaybackClock, PlaybackMode, PlaybackParameters, PlaybackSettings, TransitionClips,
};
pub use scene::{AnimatedModel, Bone, Skeleton, TransitionPhase, VertexInfluences};
pub use assets::{ImportedScene, load_scene};
