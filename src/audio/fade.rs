//! Linear gain ramps for fading voices in and out.

use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Envelope {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Envelope {
    pub(crate) fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn fade_in(duration: Duration) -> Self {
        Self::new(0.0, 1.0, duration)
    }

    /// Ramp from wherever this envelope currently is down to silence.
    pub(crate) fn fade_out_from(&self, duration: Duration) -> Self {
        Self::new(self.gain(), 0.0, duration)
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub(crate) fn gain(&self) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t.clamp(0.0, 1.0)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
