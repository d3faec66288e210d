use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Stable identity of a track for the lifetime of a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub path: PathBuf,
    /// File name shown in the status line.
    pub name: String,
}

impl Track {
    fn new(id: TrackId, path: PathBuf) -> Self {
        let name = display_name(&path);
        Self { id, path, name }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Ordered rotation of tracks. Never empty once built; removal may empty it,
/// which callers treat as [`Error::EmptyCatalog`].
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog that keeps `paths` in the given order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self> {
        if paths.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        let tracks = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| Track::new(TrackId(i as u64), path))
            .collect();
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn first(&self) -> Option<TrackId> {
        self.tracks.first().map(|t| t.id)
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Current position of `id` in the rotation.
    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Index after `i`, wrapping to the start.
    pub fn next(&self, i: usize) -> usize {
        if self.tracks.is_empty() {
            return 0;
        }
        (i + 1) % self.tracks.len()
    }

    /// Index before `i`, wrapping to the end.
    pub fn previous(&self, i: usize) -> usize {
        let len = self.tracks.len();
        if len == 0 {
            return 0;
        }
        (i % len + len - 1) % len
    }

    /// The track following `id` in the live rotation.
    pub fn next_after(&self, id: TrackId) -> Option<TrackId> {
        let pos = self.position(id)?;
        Some(self.tracks[self.next(pos)].id)
    }

    /// The track preceding `id` in the live rotation.
    pub fn previous_before(&self, id: TrackId) -> Option<TrackId> {
        let pos = self.position(id)?;
        Some(self.tracks[self.previous(pos)].id)
    }

    /// Drop a track from the rotation. Other ids stay valid.
    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        let pos = self.position(id)?;
        Some(self.tracks.remove(pos))
    }
}
