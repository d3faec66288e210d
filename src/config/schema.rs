use std::path::PathBuf;

use serde::Deserialize;

const MANIFEST_FILE: &str = "ambience-library.json";

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/ambience/config.toml` or `~/.config/ambience/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags (applied by the runtime after loading)
/// 2) Environment variables (prefix `AMBIENCE__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub fetch: FetchSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How long each sound plays by itself before crossfading (minutes).
    pub duration_minutes: f64,
    /// Scheduler ticks per second. Low on purpose; nothing needs to run often.
    pub tick_rate_hz: u32,
    /// Length of a regular crossfade, in ticks.
    pub fade_ticks: u64,
    /// Length of the crossfade used by manual next/previous, in ticks.
    pub skip_fade_ticks: u64,
    /// Fade-in applied to the very first sound (seconds).
    pub intro_fade_secs: u64,
    /// The next sound is decoded this many ticks before it is needed.
    pub preload_threshold_ticks: u64,
    /// Amount added or removed per volume key press.
    pub volume_step: f32,
    /// Fade-out when quitting (milliseconds). Quitting blocks for this long.
    pub shutdown_fade_ms: u64,
    /// Decode every sound before playback starts.
    pub preload_all: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            duration_minutes: 5.0,
            tick_rate_hz: 2,
            fade_ticks: 120,
            skip_fade_ticks: 2,
            intro_fade_secs: 3,
            preload_threshold_ticks: 10,
            volume_step: 0.05,
            shutdown_fade_ms: 4000,
            preload_all: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Upper bound of files collected from a single directory.
    pub max_files_per_dir: usize,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Directory used when no paths are given. Defaults to `~/.ambience/sounds`.
    pub sounds_dir: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["ogg".into(), "wav".into(), "flac".into()],
            max_files_per_dir: 64,
            follow_links: true,
            include_hidden: false,
            sounds_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Animation frames cycled by the status line, one char per frame.
    pub spinner: String,
    /// Print the numbered sound list at startup.
    pub show_sound_list: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            spinner: "◐◓◑◒".to_string(),
            show_sound_list: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Remote location the manifest filenames are relative to.
    pub base_url: String,
    /// Manifest listing `{filename, hash}` entries.
    /// Defaults to `<library_dir>/ambience-library.json`.
    pub manifest_path: Option<PathBuf>,
    /// Downloaded to `manifest_path` when no local manifest exists.
    /// Defaults to `<base_url>/ambience-library.json`.
    pub manifest_url: Option<String>,
    /// Where fetched files are stored. Defaults to `~/.ambience`.
    pub library_dir: Option<PathBuf>,
    /// Pause between two downloads (milliseconds).
    pub request_delay_ms: u64,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://github.com/sumpygump/ambient/raw/master".to_string(),
            manifest_path: None,
            manifest_url: None,
            library_dir: None,
            request_delay_ms: 80,
            timeout_secs: 60,
        }
    }
}

impl FetchSettings {
    /// Resolve the library directory, falling back to `~/.ambience`.
    pub fn library_dir(&self) -> PathBuf {
        self.library_dir
            .clone()
            .unwrap_or_else(|| super::home_dir().join(".ambience"))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(|| self.library_dir().join(MANIFEST_FILE))
    }

    pub fn manifest_url(&self) -> String {
        self.manifest_url.clone().unwrap_or_else(|| {
            format!("{}/{MANIFEST_FILE}", self.base_url.trim_end_matches('/'))
        })
    }
}

impl LibrarySettings {
    pub fn sounds_dir(&self) -> PathBuf {
        self.sounds_dir
            .clone()
            .unwrap_or_else(|| super::home_dir().join(".ambience").join("sounds"))
    }
}
