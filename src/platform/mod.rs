//! Platform abstraction layer
//!
//! Converts host frame timestamps (milliseconds, as handed to an animation
//! frame callback) into the frame deltas the simulation consumes.

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame. The first frame after creation or
    /// [`reset`](Self::reset) yields 0; clock skew backwards yields 0.
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms.is_finite() => ((now_ms - last) / 1000.0).max(0.0) as f32,
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        dt
    }

    /// Forget the last timestamp (after resume or restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
