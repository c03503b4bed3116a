//! Playback parameters: what to play and how, one variant per playback mode.

/// Plays one clip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaySingle {
    pub clip: usize,
    /// Normalized time in `[0, 1)`, wraps outside.
    pub normalized_time: f32,
}

/// Linearly blends two clips sampled at the same normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlendClips {
    pub clip_a: usize,
    pub clip_b: usize,
    pub normalized_time: f32,
    /// 0 = pure `clip_a`, 1 = pure `clip_b`.
    pub weight: f32,
}

/// Plays `clip_a`, cross-fades into `clip_b` from `begin_seconds` until
/// `clip_a` ends, then holds `clip_b`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionClips {
    pub clip_a: usize,
    pub clip_b: usize,
    pub elapsed_seconds: f32,
    pub begin_seconds: f32,
}

/// Caller/skeleton contract for one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackParameters {
    Single(PlaySingle),
    Blend(BlendClips),
    Transition(TransitionClips),
}

impl Default for PlaybackParameters {
    fn default() -> Self {
        Self::Single(PlaySingle::default())
    }
}

impl PlaybackParameters {
    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        match self {
            Self::Single(_) => PlaybackMode::Single,
            Self::Blend(_) => PlaybackMode::Blend,
            Self::Transition(_) => PlaybackMode::Transition,
        }
    }

    /// Clip indices referenced by these parameters, in `[a, b]` order.
    /// Single playback repeats its only clip.
    #[must_use]
    pub fn clip_indices(&self) -> [usize; 2] {
        match *self {
            Self::Single(p) => [p.clip, p.clip],
            Self::Blend(p) => [p.clip_a, p.clip_b],
            Self::Transition(p) => [p.clip_a, p.clip_b],
        }
    }

    /// Clip whose duration drives the playback timeline.
    #[must_use]
    pub fn leading_clip(&self) -> usize {
        match *self {
            Self::Single(p) => p.clip,
            Self::Blend(p) => p.clip_a,
            Self::Transition(p) => p.clip_a,
        }
    }

    /// Writes a new timeline position into the time field of the active mode.
    ///
    /// Single and Blend take normalized time, Transition takes seconds.
    pub fn set_time(&mut self, time: f32) {
        match self {
            Self::Single(p) => p.normalized_time = time,
            Self::Blend(p) => p.normalized_time = time,
            Self::Transition(p) => p.elapsed_seconds = time,
        }
    }
}

/// Discriminant of [`PlaybackParameters`], for UI mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackMode {
    Single,
    Blend,
    Transition,
}
