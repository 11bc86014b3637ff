//! Frame clock.
//!
//! Converts the host's monotonically increasing timestamp (milliseconds)
//! into a frame delta and a normalised `rate`, where `rate == 1.0` means a
//! 16 ms frame.  Every speed constant in the game is expressed per rate unit.

/// Reference frame length the speed constants were tuned for.
pub const BASELINE_FRAME_MS: f64 = 16.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub delta: f64,
    pub rate: f32,
}

#[derive(Clone, Debug, Default)]
pub struct Clock {
    pub current_time: f64,
    pub past_time: f64,
    pub delta: f64,
    pub rate: f32,
    was_paused: bool,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the clock as paused.  The next `advance` rebases instead of
    /// producing one huge catch-up frame.
    pub fn pause(&mut self) {
        self.was_paused = true;
    }

    pub fn is_paused(&self) -> bool {
        self.was_paused
    }

    pub fn advance(&mut self, timestamp: f64) -> FrameTime {
        if self.was_paused {
            self.was_paused = false;
            self.current_time = timestamp;
        }

        self.past_time = self.current_time;
        self.current_time = timestamp;
        self.delta = self.current_time - self.past_time;
        self.rate = (self.delta / BASELINE_FRAME_MS) as f32;

        FrameTime {
            delta: self.delta,
            rate: self.rate,
        }
    }

    /// Milliseconds elapsed since `reference`, measured at the current frame.
    pub fn since(&self, reference: f64) -> f64 {
        self.current_time - reference
    }
}
