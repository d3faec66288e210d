use tracing::warn;

use crate::cli::Args;
use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Command-line flags win over everything loaded from file or environment.
pub fn apply_args(settings: &mut config::Settings, args: &Args) {
    if let Some(minutes) = args.duration {
        if minutes > 0.0 && minutes.is_finite() {
            settings.playback.duration_minutes = minutes;
        } else {
            warn!("ignoring duration {minutes}; it must be a positive number of minutes");
        }
    }
    if args.noinit {
        settings.playback.preload_all = false;
    }
    if args.quiet {
        settings.ui.show_sound_list = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_loaded_settings() {
        let mut settings = config::Settings::default();
        let args = Args {
            duration: Some(0.5),
            noinit: true,
            quiet: true,
            ..Args::default()
        };
        apply_args(&mut settings, &args);
        assert_eq!(settings.playback.duration_minutes, 0.5);
        assert!(!settings.playback.preload_all);
        assert!(!settings.ui.show_sound_list);
    }

    #[test]
    fn nonsensical_duration_is_ignored() {
        let mut settings = config::Settings::default();
        for bad in [0.0, -2.0, f64::NAN] {
            apply_args(
                &mut settings,
                &Args {
                    duration: Some(bad),
                    ..Args::default()
                },
            );
            assert_eq!(settings.playback.duration_minutes, 5.0);
        }
    }
}
