//! Decoded sounds, loaded lazily and kept for the whole session.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::audio::Backend;
use crate::catalog::{Catalog, Track, TrackId};
use crate::error::{Error, Result};

/// At most one handle per track. Entries are only ever dropped together with
/// their catalog entry.
pub struct SoundCache<S> {
    sounds: HashMap<TrackId, S>,
}

impl<S: Clone> SoundCache<S> {
    pub fn new() -> Self {
        Self {
            sounds: HashMap::new(),
        }
    }

    pub fn get(&self, id: TrackId) -> Option<&S> {
        self.sounds.get(&id)
    }

    #[cfg(test)]
    pub fn contains(&self, id: TrackId) -> bool {
        self.sounds.contains_key(&id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Return the handle for `id`, decoding it on first use.
    ///
    /// A track that fails to decode is removed from `catalog` and reported as
    /// [`Error::UnplayableTrack`]; if that was the last track the error is
    /// [`Error::EmptyCatalog`] instead.
    pub fn get_or_load<B>(&mut self, catalog: &mut Catalog, backend: &B, id: TrackId) -> Result<S>
    where
        B: Backend<Sound = S>,
    {
        if let Some(sound) = self.sounds.get(&id) {
            return Ok(sound.clone());
        }

        let path = catalog.get(id).ok_or(Error::UnknownTrack(id))?.path.clone();
        match backend.load(&path) {
            Ok(sound) => {
                debug!(track = %id, path = %path.display(), "sound decoded");
                self.sounds.insert(id, sound.clone());
                Ok(sound)
            }
            Err(reason) => {
                catalog.remove(id);
                warn!("{reason} -- skipping sound '{}'", path.display());
                if catalog.is_empty() {
                    Err(Error::EmptyCatalog)
                } else {
                    Err(Error::UnplayableTrack { path, reason })
                }
            }
        }
    }

    /// Decode every track up front, dropping the ones that fail.
    /// `progress` is called once per track before it is loaded.
    pub fn preload_all<B, F>(&mut self, catalog: &mut Catalog, backend: &B, mut progress: F) -> Result<()>
    where
        B: Backend<Sound = S>,
        F: FnMut(&Track),
    {
        let ids: Vec<TrackId> = catalog.tracks().iter().map(|t| t.id).collect();
        for id in ids {
            if let Some(track) = catalog.get(id) {
                progress(track);
            }
            match self.get_or_load(catalog, backend, id) {
                Ok(_) | Err(Error::UnplayableTrack { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<S: Clone> Default for SoundCache<S> {
    fn default() -> Self {
        Self::new()
    }
}
