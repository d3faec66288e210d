use std::time::{Duration, Instant};

use crate::catalog::TrackId;

/// Mutable state of one playback session.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub current: TrackId,
    /// Next track whose sound is already decoded, if any.
    pub next_preloaded: Option<TrackId>,
    /// Ticks left before the next crossfade.
    pub play_timer: u64,
    pub fade_ticks: u64,
    /// Ticks left in the crossfade currently in progress.
    pub fading_ticks: u64,
    pub volume: f32,
    pub muted: bool,
    pub paused: bool,
    pub started_at: Instant,
}

impl PlaybackSession {
    pub fn new(current: TrackId, fade_ticks: u64) -> Self {
        Self {
            current,
            next_preloaded: None,
            play_timer: 0,
            fade_ticks,
            fading_ticks: 0,
            volume: 1.0,
            muted: false,
            paused: false,
            started_at: Instant::now(),
        }
    }

    /// Level the backend should play at right now.
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn increase_volume(&mut self, step: f32) {
        self.volume = quantize(self.volume + step).min(1.0);
    }

    pub fn decrease_volume(&mut self, step: f32) {
        self.volume = quantize(self.volume - step).max(0.0);
    }

    /// Flip mute. The stored volume is left untouched.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Round away float drift so repeated steps land on exact levels.
fn quantize(v: f32) -> f32 {
    (v * 10_000.0).round() / 10_000.0
}
