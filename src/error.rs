//! Crate-wide error type.
//!
//! Only `EmptyCatalog` is fatal for a running session. `UnplayableTrack` is
//! recovered where it is raised (the track is dropped) and exists as a value
//! so callers can log it and move on.

use std::path::PathBuf;

use thiserror::Error;

use crate::audio::AudioError;
use crate::catalog::TrackId;

#[derive(Error, Debug)]
pub enum Error {
    /// No playable files are left in the catalog.
    #[error("no sound files to load")]
    EmptyCatalog,

    /// A track failed to decode and was removed from the catalog.
    #[error("skipping sound '{}': {reason}", path.display())]
    UnplayableTrack { path: PathBuf, reason: AudioError },

    /// A track id that is no longer part of the catalog was referenced.
    #[error("unknown track {0}")]
    UnknownTrack(TrackId),

    /// Backend failures outside of decoding.
    #[error("audio backend error: {0}")]
    Audio(#[from] AudioError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP failures while fetching the sound library.
    #[error("fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The library manifest could not be read or is malformed.
    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
