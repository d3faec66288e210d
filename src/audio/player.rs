use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::backend::{AudioError, Backend};
use super::sink::{DecodedSource, decode};
use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// A sound decoded by [`AudioPlayer`]. Voices started from it are addressed
/// by `id`.
#[derive(Clone)]
pub struct RodioSound {
    id: u64,
    source: DecodedSource,
}

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
    next_sound_id: AtomicU64,
}

impl AudioPlayer {
    /// Open the default output device on a dedicated audio thread.
    pub fn new() -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let audio_handle = spawn_audio_thread(rx, ready_tx);
        ready_rx.recv().map_err(|_| AudioError::Disconnected)??;

        Ok(Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
            next_sound_id: AtomicU64::new(1),
        })
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), AudioError> {
        self.tx.send(cmd).map_err(|_| AudioError::Disconnected)
    }

    /// Ask the audio thread to fade everything out and wait for it to exit.
    pub fn quit_softly(&self, fade: Duration) -> Result<(), AudioError> {
        let sent = self.send(AudioCmd::Quit { fade });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
        sent
    }
}

impl Backend for AudioPlayer {
    type Sound = RodioSound;

    fn load(&self, path: &Path) -> Result<RodioSound, AudioError> {
        let source = decode(path)?;
        Ok(RodioSound {
            id: self.next_sound_id.fetch_add(1, Ordering::Relaxed),
            source,
        })
    }

    fn play(&self, sound: &RodioSound, fade_in: Duration) -> Result<(), AudioError> {
        self.send(AudioCmd::Play {
            sound_id: sound.id,
            source: sound.source.clone(),
            fade_in,
        })
    }

    fn fade_out(&self, sound: &RodioSound, fade: Duration) -> Result<(), AudioError> {
        self.send(AudioCmd::FadeOut {
            sound_id: sound.id,
            fade,
        })
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        self.send(AudioCmd::SetVolume(level))
    }

    fn pause_all(&self) -> Result<(), AudioError> {
        self.send(AudioCmd::Pause)
    }

    fn resume_all(&self) -> Result<(), AudioError> {
        self.send(AudioCmd::Resume)
    }

    fn fade_out_all(&self, fade: Duration) -> Result<(), AudioError> {
        self.quit_softly(fade)
    }
}
