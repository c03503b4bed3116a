//! Error Types
//!
//! This module defines the error type shared by clip sampling, skeleton
//! construction and the playback entry points.
//!
//! # Overview
//!
//! [`AnimationError`] groups failures by when they happen:
//! - Load time: [`AnimationError::MalformedSkeleton`], [`AnimationError::BoneOverflow`],
//!   [`AnimationError::InvalidClip`]. These abort construction.
//! - Per frame: [`AnimationError::MissingChannel`]. The skeleton recovers from it
//!   locally by using an identity local transform for the bone.
//! - Caller contract: [`AnimationError::InvalidTransitionWindow`],
//!   [`AnimationError::InvalidPlaybackTime`], [`AnimationError::InvalidBlendWeight`],
//!   [`AnimationError::IndexOutOfRange`].
//!   These are never clamped away.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_skeletal::errors::{AnimationError, Result};
//!
//! fn pick_clip(index: usize, len: usize) -> Result<usize> {
//!     if index >= len {
//!         return Err(AnimationError::index_out_of_range("clip", index, len));
//!     }
//!     Ok(index)
//! }
//! ```

use thiserror::Error;

/// The error type for skeletal animation evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    // ========================================================================
    // Sampling Errors
    // ========================================================================
    /// The clip has no channel for the requested bone.
    #[error("Clip '{clip}' has no channel named '{channel}'")]
    MissingChannel {
        /// Name of the sampled clip
        clip: String,
        /// Requested channel (bone) name
        channel: String,
    },

    /// Clip data cannot be played back (zero duration or rate, unsorted keys).
    #[error("Invalid clip: {0}")]
    InvalidClip(String),

    // ========================================================================
    // Load-time Structural Errors
    // ========================================================================
    /// Parent links do not form a single-rooted tree.
    #[error("Malformed skeleton: {0}")]
    MalformedSkeleton(String),

    /// A vertex is influenced by more bones than it has slots for.
    #[error("Vertex {vertex} already has the maximum number of bone influences, cannot add bone '{bone}'")]
    BoneOverflow {
        /// Index of the offending vertex
        vertex: usize,
        /// Name of the bone that did not fit
        bone: String,
    },

    // ========================================================================
    // Caller Contract Errors
    // ========================================================================
    /// Transition starts outside of the first clip.
    #[error("Invalid transition window: begin time {begin}s is outside clip duration {duration}s")]
    InvalidTransitionWindow {
        /// Requested transition begin time (seconds)
        begin: f32,
        /// Duration of the first clip (seconds)
        duration: f32,
    },

    /// Elapsed playback time is NaN or infinite.
    #[error("Invalid playback time {0}, expected a finite value")]
    InvalidPlaybackTime(f32),

    /// Blend weight outside of `[0, 1]`.
    #[error("Invalid blend weight {0}, expected a value in [0, 1]")]
    InvalidBlendWeight(f32),

    /// An index does not refer to an existing clip, bone or vertex.
    #[error("Index out of range: {context} (index: {index}, len: {len})")]
    IndexOutOfRange {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
        /// Number of valid entries
        len: usize,
    },

    /// Playback was requested on a model that has no skeleton.
    #[error("Model has no skeleton")]
    NoSkeleton,
}

impl AnimationError {
    #[must_use]
    pub fn index_out_of_range(context: &str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            context: context.to_string(),
            index,
            len,
        }
    }
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
