/// Largest frame delta (ms) handed to the simulation in one step.
/// Frames arriving after a long gap (backgrounded tab, dropped frames) are
/// treated as a single 32 ms step instead of a jump.
pub const MAX_FRAME_DT_MS: f32 = 32.0;

/// Frame clock driven by host timestamps.
/// Tracks the last frame time and produces the clamped per-frame delta.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// Timestamp of the previous frame, in milliseconds.
    last_time: f64,
}

impl FrameClock {
    pub fn new(now_ms: f64) -> Self {
        Self { last_time: now_ms }
    }

    /// Advance to `now_ms` and return the elapsed time, clamped to
    /// `[0, MAX_FRAME_DT_MS]`. A timestamp earlier than the previous one
    /// yields zero rather than a negative step.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let elapsed = (now_ms - self.last_time).clamp(0.0, MAX_FRAME_DT_MS as f64);
        self.last_time = now_ms;
        elapsed as f32
    }

    /// Timestamp of the previous frame.
    pub fn last_time(&self) -> f64 {
        self.last_time
    }
}
