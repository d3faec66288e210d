//! Commands understood by the audio thread.

use std::time::Duration;

use super::sink::DecodedSource;

pub(super) enum AudioCmd {
    /// Start a new looping voice for `sound_id`.
    Play {
        sound_id: u64,
        source: DecodedSource,
        fade_in: Duration,
    },
    /// Fade out and retire every voice of `sound_id`.
    FadeOut { sound_id: u64, fade: Duration },
    /// Master level for all voices.
    SetVolume(f32),
    Pause,
    Resume,
    /// Fade everything out over `fade`, then stop the thread.
    Quit { fade: Duration },
}
