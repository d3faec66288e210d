//! Audio backend: the playback engine the scheduler drives.
//!
//! The scheduler only talks to the [`Backend`] trait. [`AudioPlayer`] is the
//! `rodio` implementation: sounds are decoded on the caller's thread, then a
//! dedicated audio thread owns the output stream, one sink per playing voice,
//! and steps fade envelopes.

mod backend;
mod fade;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{AudioError, Backend};
pub use player::AudioPlayer;
