use std::time::Duration;

use crate::config::PlaybackSettings;

/// Tick arithmetic derived once from the playback settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeTiming {
    tick_rate: u32,
    play_ticks: u64,
    fade_ticks: u64,
    skip_fade_ticks: u64,
    intro_fade: Duration,
    preload_threshold: u64,
}

impl FadeTiming {
    pub fn new(settings: &PlaybackSettings) -> Self {
        let tick_rate = settings.tick_rate_hz.max(1);
        let play_ticks = (settings.duration_minutes * 60.0 * f64::from(tick_rate)).round();
        let play_ticks = if play_ticks.is_finite() && play_ticks >= 1.0 {
            play_ticks as u64
        } else {
            1
        };

        Self {
            tick_rate,
            play_ticks,
            fade_ticks: effective_fade_ticks(play_ticks, settings.fade_ticks),
            skip_fade_ticks: settings.skip_fade_ticks.max(1),
            intro_fade: Duration::from_secs(settings.intro_fade_secs),
            preload_threshold: settings.preload_threshold_ticks,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.tick_rate))
    }

    pub fn play_ticks(&self) -> u64 {
        self.play_ticks
    }

    pub fn fade_ticks(&self) -> u64 {
        self.fade_ticks
    }

    pub fn skip_fade_ticks(&self) -> u64 {
        self.skip_fade_ticks
    }

    pub fn intro_fade(&self) -> Duration {
        self.intro_fade
    }

    pub fn ticks_to_duration(&self, ticks: u64) -> Duration {
        Duration::from_millis(ticks.saturating_mul(1000) / u64::from(self.tick_rate))
    }

    pub fn fade_duration(&self) -> Duration {
        self.ticks_to_duration(self.fade_ticks)
    }

    /// Countdown for the first sound, which starts with the intro fade.
    pub fn initial_timer(&self) -> u64 {
        let intro_ticks = self.intro_fade.as_secs().saturating_mul(u64::from(self.tick_rate));
        self.play_ticks
            .saturating_sub(self.fade_ticks / 2)
            .saturating_sub(intro_ticks)
    }

    /// Countdown after a crossfade that used `fade_ticks`.
    pub fn timer_after_fade(&self, fade_ticks: u64) -> u64 {
        self.play_ticks.saturating_sub(fade_ticks / 2)
    }

    /// Timer value at which the next sound gets decoded.
    pub fn preload_at(&self) -> u64 {
        self.preload_threshold.min(self.play_ticks / 2)
    }
}

/// A fade never outlasts the play duration. When the play duration does not
/// exceed the configured fade window, the fade shrinks to a fifth of it.
pub fn effective_fade_ticks(play_ticks: u64, configured_fade: u64) -> u64 {
    let fade = if play_ticks <= configured_fade {
        play_ticks / 5
    } else {
        configured_fade
    };
    fade.clamp(1, play_ticks.max(1))
}
