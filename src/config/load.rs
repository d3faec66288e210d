use std::{env, path::PathBuf};

use super::schema::Settings;

/// Upper bound for configured fades; a day at 10 Hz.
pub(super) const MAX_FADE_TICKS: u64 = 864_000;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `AMBIENCE__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("AMBIENCE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let p = &self.playback;
        if p.tick_rate_hz == 0 {
            return Err("playback.tick_rate_hz must be >= 1".to_string());
        }
        if !(p.duration_minutes > 0.0) {
            return Err("playback.duration_minutes must be > 0".to_string());
        }
        if p.fade_ticks == 0 || p.skip_fade_ticks == 0 {
            return Err("playback fade lengths must be >= 1 tick".to_string());
        }
        if p.fade_ticks > MAX_FADE_TICKS || p.skip_fade_ticks > MAX_FADE_TICKS {
            return Err(format!("playback fade lengths must be <= {MAX_FADE_TICKS} ticks"));
        }
        if !(p.volume_step > 0.0 && p.volume_step <= 1.0) {
            return Err("playback.volume_step must be in (0, 1]".to_string());
        }
        if self.library.max_files_per_dir == 0 {
            return Err("library.max_files_per_dir must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `AMBIENCE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("AMBIENCE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/ambience/config.toml`
/// or `~/.config/ambience/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("ambience").join("config.toml"))
}

/// The user's home directory (`HOME`, then `USERPROFILE`), or `.` if neither is set.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
