use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device: {0}")]
    Device(String),

    #[error("audio thread is gone")]
    Disconnected,
}

/// Playback engine contract.
///
/// Every call except [`Backend::load`] and [`Backend::fade_out_all`] is
/// fire-and-forget: it returns as soon as the command is queued.
pub trait Backend {
    /// Decoded sound, cheap to clone and replayable any number of times.
    type Sound: Clone;

    fn load(&self, path: &Path) -> Result<Self::Sound, AudioError>;

    /// Start `sound` looping forever, fading in from silence over `fade_in`.
    fn play(&self, sound: &Self::Sound, fade_in: Duration) -> Result<(), AudioError>;

    /// Fade out every voice currently playing `sound`, then stop them.
    fn fade_out(&self, sound: &Self::Sound, fade: Duration) -> Result<(), AudioError>;

    /// Master level applied on top of every voice's fade envelope.
    fn set_volume(&self, level: f32) -> Result<(), AudioError>;

    fn pause_all(&self) -> Result<(), AudioError>;

    fn resume_all(&self) -> Result<(), AudioError>;

    /// Fade out everything and block until the fade has completed.
    fn fade_out_all(&self, fade: Duration) -> Result<(), AudioError>;
}
