//! Fixed-rate frame clock for the native driver
//!
//! Frame `k` lands on `round(k * 1000 / frame_rate)` ms, so the clock never
//! drifts from the configured rate even when a frame isn't a whole number of
//! milliseconds.

/// Synthetic monotonic clock stepped one frame at a time
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_rate: u64,
    frames: u64,
}

impl FrameClock {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate: u64::from(frame_rate.max(1)),
            frames: 0,
        }
    }

    /// Frame delta (seconds)
    pub fn dt(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }

    /// Current reading (ms)
    pub fn now_ms(&self) -> u64 {
        (self.frames * 1000 + self.frame_rate / 2) / self.frame_rate
    }

    /// Step one frame and return the new reading
    pub fn advance(&mut self) -> u64 {
        self.frames += 1;
        self.now_ms()
    }

    /// Whole frames covering `secs`, at least one
    pub fn frames_in(&self, secs: f32) -> u64 {
        ((secs * self.frame_rate as f32).round() as u64).max(1)
    }
}
