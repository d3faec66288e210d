use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::audio::Backend;
use crate::catalog::{Catalog, columns, numbered_listing};
use crate::cli::Args;
use crate::config::LibrarySettings;
use crate::error::Result;
use crate::scheduler::Scheduler;

const RULE_WIDTH: usize = 60;

pub fn version_line() -> String {
    format!("Ambience version {}", env!("CARGO_PKG_VERSION"))
}

/// Directories and files to scan. Without explicit paths this is the
/// configured sounds directory, with a hint when it does not exist yet.
pub fn sound_roots<W: Write>(
    args: &Args,
    library: &LibrarySettings,
    quiet: bool,
    out: &mut W,
) -> io::Result<Vec<PathBuf>> {
    if let Some(paths) = args.sound_paths() {
        return Ok(paths.iter().map(|p| absolute(p)).collect());
    }

    let dir = library.sounds_dir();
    if !dir.is_dir() && !quiet {
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(out)?;
        writeln!(out, "{rule}")?;
        writeln!(out, "No sounds found in {}.", dir.display())?;
        writeln!(out, "Use ambience --fetch-library to download the sound library.")?;
        writeln!(out, "{rule}")?;
    }
    Ok(vec![dir])
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn print_roots<W: Write>(roots: &[PathBuf], out: &mut W) -> io::Result<()> {
    writeln!(out, "Reading sounds from paths")?;
    for root in roots {
        writeln!(out, " - {}", root.display())?;
    }
    writeln!(out)
}

pub fn print_listing<W: Write>(catalog: &Catalog, roots: &[PathBuf], out: &mut W) -> io::Result<()> {
    writeln!(out, "Sounds:")?;
    for line in columns(&numbered_listing(catalog, roots)) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Decode every sound, printing a dot per sound unless quiet.
pub fn preload<B: Backend, W: Write>(
    scheduler: &mut Scheduler<B>,
    quiet: bool,
    out: &mut W,
) -> Result<()> {
    if !quiet {
        write!(out, "\nInitializing sounds ")?;
        out.flush()?;
    }
    scheduler.preload_all(|_| {
        if !quiet {
            let _ = write!(out, ".");
            let _ = out.flush();
        }
    })?;
    if !quiet {
        writeln!(out)?;
    }
    Ok(())
}

pub fn print_key_help<W: Write>(read_input: bool, out: &mut W) -> io::Result<()> {
    writeln!(out, "\nPlaying sounds. Press Ctrl-C to exit.")?;
    if read_input {
        writeln!(out, "Press '[' and ']' to change volume and press 'm' to mute.")?;
        writeln!(
            out,
            "Press 'n' to go to next sound, or 'p' to go to previous sound. \
             Press 's' to pause and 'q' to quit."
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::audio::fake::FakeBackend;
    use crate::config::PlaybackSettings;
    use crate::scheduler::FadeTiming;

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn missing_default_directory_prints_guidance() {
        let dir = tempdir().unwrap();
        let library = LibrarySettings {
            sounds_dir: Some(dir.path().join("sounds")),
            ..LibrarySettings::default()
        };

        let mut out = Vec::new();
        let roots = sound_roots(&Args::default(), &library, false, &mut out).unwrap();
        assert_eq!(roots, vec![dir.path().join("sounds")]);
        assert!(text(out).contains("--fetch-library"));

        let mut quiet = Vec::new();
        sound_roots(&Args::default(), &library, true, &mut quiet).unwrap();
        assert!(quiet.is_empty());

        fs::create_dir(dir.path().join("sounds")).unwrap();
        let mut out = Vec::new();
        sound_roots(&Args::default(), &library, false, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn explicit_paths_are_made_absolute() {
        let args = Args {
            paths: vec![PathBuf::from("rain.ogg")],
            ..Args::default()
        };
        let roots = sound_roots(&args, &LibrarySettings::default(), true, &mut Vec::new()).unwrap();
        assert!(roots[0].is_absolute());
        assert!(roots[0].ends_with("rain.ogg"));
    }

    #[test]
    fn preload_prints_a_dot_per_sound() {
        let catalog = Catalog::from_paths(vec!["a.ogg".into(), "b.ogg".into()]).unwrap();
        let timing = FadeTiming::new(&PlaybackSettings::default());
        let mut scheduler = Scheduler::new(catalog, FakeBackend::new(), timing).unwrap();

        let mut out = Vec::new();
        preload(&mut scheduler, false, &mut out).unwrap();
        assert_eq!(text(out), "\nInitializing sounds ..\n");
        assert_eq!(scheduler.backend().loads().len(), 2);
    }

    #[test]
    fn key_help_mentions_keys_only_when_reading_input() {
        let mut with_keys = Vec::new();
        print_key_help(true, &mut with_keys).unwrap();
        let with_keys = text(with_keys);
        assert!(with_keys.contains("Press 'n' to go to next sound"));

        let mut without = Vec::new();
        print_key_help(false, &mut without).unwrap();
        assert_eq!(text(without), "\nPlaying sounds. Press Ctrl-C to exit.\n");
    }

    #[test]
    fn version_line_uses_crate_version() {
        assert_eq!(version_line(), format!("Ambience version {}", env!("CARGO_PKG_VERSION")));
    }
}
