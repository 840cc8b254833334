use glam::Vec2;

/// A pointer with no new sample for this long counts as resting.
pub const POINTER_IDLE_MS: f64 = 100.0;

/// Pointer state handed to blobs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Position in surface coordinates.
    pub position: Vec2,
    /// Delta between the two most recent samples, reported to one frame
    /// only. Zero while resting.
    pub velocity: Vec2,
    pub is_moving: bool,
}

/// Turns raw pointer positions into velocity and a moving/resting state.
///
/// Each recorded delta is handed out by one `sample` only, so a single move
/// pushes blobs once. The pointer keeps counting as moving until it has been
/// still for `POINTER_IDLE_MS`.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    last: Option<(Vec2, f64)>,
    velocity: Vec2,
    moved: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, x: f32, y: f32, time_ms: f64) {
        let position = Vec2::new(x, y);
        let delta = match self.last {
            Some((prev, _)) => position - prev,
            None => Vec2::ZERO,
        };
        self.velocity = delta;
        self.moved = delta != Vec2::ZERO;
        self.last = Some((position, time_ms));
    }

    /// Forget the pointer until the next sample.
    pub fn leave(&mut self) {
        self.last = None;
        self.velocity = Vec2::ZERO;
        self.moved = false;
    }

    /// Pointer state for the frame at `now_ms`, or `None` when no pointer
    /// is over the surface. Call once per frame: the pending delta is
    /// consumed.
    pub fn sample(&mut self, now_ms: f64) -> Option<PointerSample> {
        let (position, time) = self.last?;
        let velocity = std::mem::take(&mut self.velocity);
        let is_moving = self.moved && now_ms - time < POINTER_IDLE_MS;
        Some(PointerSample {
            position,
            velocity: if is_moving { velocity } else { Vec2::ZERO },
            is_moving,
        })
    }
}
