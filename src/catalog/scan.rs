use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::Result;

use super::model::Catalog;

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn scan_dir(dir: &Path, settings: &LibrarySettings, exts: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    // Files collected per parent directory, capped at `max_files_per_dir`.
    let mut per_dir: HashMap<PathBuf, usize> = HashMap::new();

    let walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                None
            }
        })
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, exts) {
            continue;
        }
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let count = per_dir.entry(parent).or_insert(0);
        if *count >= settings.max_files_per_dir {
            continue;
        }
        *count += 1;
        files.push(path.to_path_buf());
    }

    files
}

/// Collect audio files from `paths` in scan order.
///
/// Directories are walked recursively; plain files are accepted when their
/// extension is on the allowlist. Paths that do not exist are reported and
/// skipped.
pub fn collect_paths(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let exts = normalized_extensions(settings);
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(scan_dir(path, settings, &exts));
        } else if path.is_file() {
            if is_audio_file(path, &exts) {
                files.push(path.clone());
            } else {
                debug!("ignoring non-audio file {}", path.display());
            }
        } else {
            warn!("path '{}' not found", path.display());
        }
    }

    files
}

/// Scan `paths`, shuffle the result once and build the session catalog.
pub fn build<R: Rng + ?Sized>(
    paths: &[PathBuf],
    settings: &LibrarySettings,
    rng: &mut R,
) -> Result<Catalog> {
    let mut files = collect_paths(paths, settings);
    files.shuffle(rng);
    Catalog::from_paths(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let exts = normalized_extensions(&LibrarySettings::default());
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.OGG"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a.mp3"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a"), &exts));
    }

    #[test]
    fn normalized_extensions_strip_dots_and_blanks() {
        let settings = LibrarySettings {
            extensions: vec![".OGG".into(), " wav ".into(), "".into()],
            ..LibrarySettings::default()
        };
        assert_eq!(normalized_extensions(&settings), vec!["ogg", "wav"]);
    }

    #[test]
    fn collect_recurses_and_filters_non_audio() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("forest");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.path().join("rain.ogg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(sub.join("birds.flac"), b"x").unwrap();

        let files = collect_paths(&[dir.path().to_path_buf()], &LibrarySettings::default());
        assert_eq!(files.len(), 2);
        assert!(files.contains(&dir.path().join("rain.ogg")));
        assert!(files.contains(&sub.join("birds.flac")));
    }

    #[test]
    fn collect_caps_files_per_directory() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("{i}.wav")), b"x").unwrap();
            fs::write(sub.join(format!("{i}.wav")), b"x").unwrap();
        }

        let settings = LibrarySettings {
            max_files_per_dir: 3,
            ..LibrarySettings::default()
        };
        let files = collect_paths(&[dir.path().to_path_buf()], &settings);
        let in_root = files.iter().filter(|p| p.parent() == Some(dir.path())).count();
        let in_sub = files
            .iter()
            .filter(|p| p.parent() == Some(sub.as_path()))
            .count();
        assert_eq!(in_root, 3);
        assert_eq!(in_sub, 3);
    }

    #[test]
    fn collect_accepts_plain_files_and_skips_missing_paths() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("waves.wav");
        fs::write(&file, b"x").unwrap();
        let other = dir.path().join("readme.md");
        fs::write(&other, b"x").unwrap();

        let files = collect_paths(
            &[file.clone(), other, dir.path().join("missing")],
            &LibrarySettings::default(),
        );
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn collect_skips_hidden_entries_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.ogg"), b"x").unwrap();
        fs::write(dir.path().join("visible.ogg"), b"x").unwrap();

        let files = collect_paths(&[dir.path().to_path_buf()], &LibrarySettings::default());
        assert_eq!(files, vec![dir.path().join("visible.ogg")]);
    }
}
