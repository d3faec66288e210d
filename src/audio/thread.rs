use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::debug;

use super::backend::AudioError;
use super::fade::Envelope;
use super::sink::create_looping_sink;
use super::types::AudioCmd;

/// How often fade envelopes are stepped.
const FADE_STEP: Duration = Duration::from_millis(25);

struct Voice {
    sound_id: u64,
    sink: Sink,
    envelope: Envelope,
    retiring: bool,
}

/// Mutable state owned by the audio thread.
struct Voices {
    voices: Vec<Voice>,
    master: f32,
    paused: bool,
}

impl Voices {
    fn new() -> Self {
        Self {
            voices: Vec::new(),
            master: 1.0,
            paused: false,
        }
    }

    fn fade_out(&mut self, sound_id: u64, fade: Duration) {
        for v in self.voices.iter_mut().filter(|v| v.sound_id == sound_id && !v.retiring) {
            v.envelope = v.envelope.fade_out_from(fade);
            v.retiring = true;
        }
    }

    fn fade_out_everything(&mut self, fade: Duration) {
        for v in self.voices.iter_mut() {
            v.envelope = v.envelope.fade_out_from(fade);
            v.retiring = true;
        }
    }

    /// Advance envelopes by `dt`, push gains to the sinks and drop voices
    /// whose fade-out has finished.
    fn step(&mut self, dt: Duration, force: bool) {
        let advance = force || !self.paused;
        for v in self.voices.iter_mut() {
            if advance {
                v.envelope.advance(dt);
            }
            v.sink.set_volume(self.master * v.envelope.gain());
        }

        self.voices.retain(|v| {
            let done = v.retiring && v.envelope.is_finished();
            if done {
                v.sink.stop();
            }
            !done
        });
    }

    /// Fade every voice out over `fade`, blocking until they are silent,
    /// then stop whatever is left. Envelopes advance even while paused.
    fn drain(&mut self, fade: Duration) {
        self.fade_out_everything(fade);
        let deadline = Instant::now() + fade;
        let mut last = Instant::now();
        while !self.voices.is_empty() && Instant::now() < deadline {
            thread::sleep(FADE_STEP);
            let now = Instant::now();
            self.step(now - last, true);
            last = now;
        }
        for v in self.voices.drain(..) {
            v.sink.stop();
        }
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        for v in &self.voices {
            if paused {
                v.sink.pause();
            } else {
                v.sink.play();
            }
        }
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    ready: SyncSender<Result<(), AudioError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(AudioError::Device(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the status line.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut state = Voices::new();
        let mut last_step = Instant::now();

        loop {
            let received = rx.recv_timeout(FADE_STEP);

            let now = Instant::now();
            state.step(now - last_step, false);
            last_step = now;

            match received {
                Ok(AudioCmd::Play {
                    sound_id,
                    source,
                    fade_in,
                }) => {
                    let sink = create_looping_sink(stream.mixer(), source);
                    if state.paused {
                        sink.pause();
                    }
                    debug!(sound_id, ?fade_in, "voice started");
                    state.voices.push(Voice {
                        sound_id,
                        sink,
                        envelope: Envelope::fade_in(fade_in),
                        retiring: false,
                    });
                }
                Ok(AudioCmd::FadeOut { sound_id, fade }) => {
                    debug!(sound_id, ?fade, "voice fading out");
                    state.fade_out(sound_id, fade);
                }
                Ok(AudioCmd::SetVolume(level)) => {
                    state.master = level.clamp(0.0, 1.0);
                }
                Ok(AudioCmd::Pause) => state.set_paused(true),
                Ok(AudioCmd::Resume) => state.set_paused(false),
                Ok(AudioCmd::Quit { fade }) => {
                    state.drain(fade);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("audio command channel closed; stopping playback");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use rodio::queue::SourcesQueueOutput;

    use super::*;

    /// A voice on a sink that is not connected to any device. The queue
    /// output has to outlive the sink.
    fn voice(sound_id: u64, envelope: Envelope) -> (Voice, SourcesQueueOutput) {
        let (sink, queue) = Sink::new();
        let voice = Voice {
            sound_id,
            sink,
            envelope,
            retiring: false,
        };
        (voice, queue)
    }

    fn gain_of(state: &Voices, index: usize) -> f32 {
        state.voices[index].envelope.gain()
    }

    #[test]
    fn restarting_a_sound_keeps_the_new_voice_alive() {
        let mut state = Voices::new();
        let (old, _q1) = voice(1, Envelope::new(1.0, 1.0, Duration::ZERO));
        state.voices.push(old);

        // single-track restart: fade the outgoing voice, then start the same sound again
        state.fade_out(1, Duration::from_millis(100));
        let (new, _q2) = voice(1, Envelope::fade_in(Duration::from_millis(100)));
        state.voices.push(new);

        state.step(Duration::from_millis(50), false);
        assert!((gain_of(&state, 0) - 0.5).abs() < 1e-6);
        assert!((gain_of(&state, 1) - 0.5).abs() < 1e-6);

        state.step(Duration::from_millis(50), false);
        assert_eq!(state.voices.len(), 1);
        assert!(!state.voices[0].retiring);
        assert_eq!(gain_of(&state, 0), 1.0);
    }

    #[test]
    fn fading_out_again_leaves_retiring_voices_alone() {
        let mut state = Voices::new();
        let (old, _q1) = voice(1, Envelope::new(1.0, 1.0, Duration::ZERO));
        state.voices.push(old);
        state.fade_out(1, Duration::from_millis(100));
        state.step(Duration::from_millis(50), false);

        let (new, _q2) = voice(1, Envelope::new(1.0, 1.0, Duration::ZERO));
        state.voices.push(new);
        state.fade_out(1, Duration::from_secs(10));

        // the first voice keeps its short ramp instead of restarting a long one
        state.step(Duration::from_millis(50), false);
        assert_eq!(state.voices.len(), 1);
        assert!(state.voices[0].retiring);
        assert!(gain_of(&state, 0) > 0.99);
    }

    #[test]
    fn paused_voices_hold_their_envelope_unless_forced() {
        let mut state = Voices::new();
        let (v, _q) = voice(7, Envelope::fade_in(Duration::from_millis(100)));
        state.voices.push(v);

        state.set_paused(true);
        assert!(state.voices[0].sink.is_paused());
        state.step(Duration::from_millis(50), false);
        assert_eq!(gain_of(&state, 0), 0.0);

        state.step(Duration::from_millis(50), true);
        assert!((gain_of(&state, 0) - 0.5).abs() < 1e-6);

        state.set_paused(false);
        assert!(!state.voices[0].sink.is_paused());
    }

    #[test]
    fn sink_volume_is_master_times_envelope() {
        let mut state = Voices::new();
        let (v, _q) = voice(3, Envelope::new(1.0, 1.0, Duration::ZERO));
        state.voices.push(v);
        state.master = 0.4;

        state.step(Duration::from_millis(25), false);
        assert!((state.voices[0].sink.volume() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn drain_blocks_until_every_voice_has_faded() {
        let mut state = Voices::new();
        let (a, _q1) = voice(1, Envelope::new(1.0, 1.0, Duration::ZERO));
        let (b, _q2) = voice(2, Envelope::fade_in(Duration::from_secs(5)));
        state.voices.push(a);
        state.voices.push(b);
        state.set_paused(true);

        let fade = Duration::from_millis(100);
        let started = Instant::now();
        state.drain(fade);

        assert!(started.elapsed() >= fade);
        assert!(state.voices.is_empty());
    }
}
