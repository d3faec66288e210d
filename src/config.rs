//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive playback timing, library
//! scanning, the status line and the library fetcher, plus helpers to load
//! them from disk and the environment.

mod load;
mod schema;

pub use load::home_dir;
pub use schema::*;
