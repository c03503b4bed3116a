use crate::animation::settings::{LoopMode, PlaybackSettings};

/// Per-frame playback timeline.
///
/// Advances by the frame delta scaled by [`PlaybackSettings::time_scale`] and
/// applies the loop mode against `end`. The clock carries no global state; the
/// render loop owns one and feeds its time into
/// [`PlaybackParameters`](super::params::PlaybackParameters) each frame.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    pub time: f32,
    pub settings: PlaybackSettings,
    pub paused: bool,
    end: f32,
    // Unreflected position inside the ping-pong period
    phase: f32,
}

impl PlaybackClock {
    #[must_use]
    pub fn new(end: f32, settings: PlaybackSettings) -> Self {
        Self {
            time: 0.0,
            settings,
            paused: false,
            end,
            phase: 0.0,
        }
    }

    #[must_use]
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Changes the timeline length and restarts from zero, as when the
    /// selected clip changes.
    pub fn reset(&mut self, end: f32) {
        self.end = end;
        self.time = 0.0;
        self.phase = 0.0;
        self.paused = false;
    }

    /// Timeline position as a fraction of `end`.
    #[must_use]
    pub fn normalized(&self) -> f32 {
        if self.end > 0.0 {
            self.time / self.end
        } else {
            0.0
        }
    }

    /// Advances the timeline by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        let end = self.end;
        if end <= 0.0 {
            return;
        }

        let step = dt * self.settings.time_scale;

        match self.settings.loop_mode {
            LoopMode::Once => {
                self.time += step;
                if self.time >= end {
                    self.time = end;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                self.time += step;
                if self.time >= end || self.time < 0.0 {
                    self.time = self.time.rem_euclid(end);
                }
            }
            LoopMode::PingPong => {
                let period = end * 2.0;
                self.phase = (self.phase + step).rem_euclid(period);
                // Second half of the period plays backwards
                self.time = if self.phase > end {
                    period - self.phase
                } else {
                    self.phase
                };
            }
        }
    }
}
