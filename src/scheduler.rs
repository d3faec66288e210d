//! Tick-driven playback scheduler.
//!
//! Each tick counts down the current sound's play timer. Shortly before it
//! runs out the next sound is decoded; when it would go negative the current
//! sound fades out while the next one fades in. Manual skips run the same
//! crossfade immediately with a shorter fade.

mod session;
mod timing;

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::{AudioError, Backend};
use crate::cache::SoundCache;
use crate::catalog::{Catalog, Track, TrackId};
use crate::error::{Error, Result};

pub use session::PlaybackSession;
pub use timing::{FadeTiming, effective_fade_ticks};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Running,
    /// A crossfade is in progress.
    Transitioning,
    Stopping,
    Stopped,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

pub struct Scheduler<B: Backend> {
    backend: B,
    catalog: Catalog,
    cache: SoundCache<B::Sound>,
    timing: FadeTiming,
    session: PlaybackSession,
    phase: Phase,
}

fn warn_on_err(what: &str, result: std::result::Result<(), AudioError>) {
    if let Err(e) = result {
        warn!("{what} failed: {e}");
    }
}

impl<B: Backend> Scheduler<B> {
    pub fn new(catalog: Catalog, backend: B, timing: FadeTiming) -> Result<Self> {
        let first = catalog.first().ok_or(Error::EmptyCatalog)?;
        let session = PlaybackSession::new(first, timing.fade_ticks());
        Ok(Self {
            backend,
            catalog,
            cache: SoundCache::new(),
            timing,
            session,
            phase: Phase::Starting,
        })
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn timing(&self) -> &FadeTiming {
        &self.timing
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.catalog.get(self.session.current)
    }

    /// Decode every sound before playback starts.
    pub fn preload_all<F: FnMut(&Track)>(&mut self, progress: F) -> Result<()> {
        self.cache
            .preload_all(&mut self.catalog, &self.backend, progress)?;
        self.ensure_current();
        Ok(())
    }

    /// Start the first sound with the intro fade.
    pub fn start(&mut self) -> Result<()> {
        self.ensure_current();
        let sound = loop {
            if self.catalog.is_empty() {
                return Err(Error::EmptyCatalog);
            }
            match self
                .cache
                .get_or_load(&mut self.catalog, &self.backend, self.session.current)
            {
                Ok(sound) => break sound,
                Err(Error::UnplayableTrack { .. }) | Err(Error::UnknownTrack(_)) => {
                    self.ensure_current();
                }
                Err(e) => return Err(e),
            }
        };

        warn_on_err(
            "setting volume",
            self.backend.set_volume(self.session.effective_volume()),
        );
        warn_on_err("play", self.backend.play(&sound, self.timing.intro_fade()));
        self.session.play_timer = self.timing.initial_timer();
        self.session.started_at = Instant::now();
        self.phase = Phase::Running;
        if let Some(track) = self.current_track() {
            info!(track = %track.name, "playing");
        }
        Ok(())
    }

    /// Advance the clock by one tick. Only [`Error::EmptyCatalog`] escapes.
    pub fn tick(&mut self) -> Result<()> {
        if self.session.paused || !matches!(self.phase, Phase::Running | Phase::Transitioning) {
            return Ok(());
        }

        if self.session.fading_ticks > 0 {
            self.session.fading_ticks -= 1;
            if self.session.fading_ticks == 0 {
                self.phase = Phase::Running;
            }
        }

        if self.session.play_timer > 0 {
            self.session.play_timer -= 1;
            if self.session.play_timer == self.timing.preload_at() {
                self.preload_next()?;
            }
            Ok(())
        } else {
            self.crossfade(Direction::Forward, self.session.fade_ticks)
        }
    }

    /// Move to the neighbouring sound right away, using the short skip fade.
    pub fn skip(&mut self, direction: Direction) -> Result<()> {
        if !matches!(self.phase, Phase::Running | Phase::Transitioning) {
            return Ok(());
        }
        self.crossfade(direction, self.timing.skip_fade_ticks())
    }

    pub fn increase_volume(&mut self, step: f32) {
        self.session.increase_volume(step);
        self.apply_volume();
    }

    pub fn decrease_volume(&mut self, step: f32) {
        self.session.decrease_volume(step);
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.session.toggle_mute();
        self.apply_volume();
    }

    pub fn toggle_pause(&mut self) {
        let paused = !self.session.paused;
        self.set_paused(paused);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.session.paused == paused {
            return;
        }
        self.session.paused = paused;
        if paused {
            warn_on_err("pause", self.backend.pause_all());
        } else {
            warn_on_err("resume", self.backend.resume_all());
        }
    }

    /// Fade everything out, blocking for `fade`.
    pub fn shutdown(&mut self, fade: Duration) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Stopping;
        warn_on_err("final fade-out", self.backend.fade_out_all(fade));
        self.phase = Phase::Stopped;
    }

    fn apply_volume(&self) {
        warn_on_err(
            "setting volume",
            self.backend.set_volume(self.session.effective_volume()),
        );
    }

    /// Point `current` at a live track after removals.
    fn ensure_current(&mut self) {
        if self.catalog.get(self.session.current).is_none() {
            if let Some(first) = self.catalog.first() {
                self.session.current = first;
            }
        }
    }

    fn neighbour(&self, direction: Direction) -> Result<TrackId> {
        let id = self.session.current;
        match direction {
            Direction::Forward => self.catalog.next_after(id),
            Direction::Backward => self.catalog.previous_before(id),
        }
        .ok_or(Error::EmptyCatalog)
    }

    fn preload_next(&mut self) -> Result<()> {
        let next = self.neighbour(Direction::Forward)?;
        match self.cache.get_or_load(&mut self.catalog, &self.backend, next) {
            Ok(_) => {
                debug!(track = %next, "next sound preloaded");
                self.session.next_preloaded = Some(next);
                Ok(())
            }
            Err(Error::UnplayableTrack { .. }) => {
                self.session.next_preloaded = None;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Find the neighbour in `direction` that decodes, dropping broken ones.
    fn load_neighbour(&mut self, direction: Direction) -> Result<(TrackId, B::Sound)> {
        loop {
            let target = self.neighbour(direction)?;
            match self.cache.get_or_load(&mut self.catalog, &self.backend, target) {
                Ok(sound) => return Ok((target, sound)),
                Err(Error::UnplayableTrack { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn crossfade(&mut self, direction: Direction, fade_ticks: u64) -> Result<()> {
        let (target, incoming) = self.load_neighbour(direction)?;
        let fade = self.timing.ticks_to_duration(fade_ticks);

        if let Some(outgoing) = self.cache.get(self.session.current) {
            debug!(track = %self.session.current, ?fade, "fading out");
            warn_on_err("fade-out", self.backend.fade_out(outgoing, fade));
        }

        self.session.current = target;
        self.session.next_preloaded = None;
        warn_on_err("play", self.backend.play(&incoming, fade));

        self.session.play_timer = self.timing.timer_after_fade(fade_ticks);
        self.session.fading_ticks = fade_ticks;
        self.phase = Phase::Transitioning;

        if let Some(track) = self.current_track() {
            info!(track = %track.name, ?fade, "crossfading");
        }
        Ok(())
    }
}
