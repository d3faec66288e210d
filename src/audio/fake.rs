//! In-memory backend that records every call, for scheduler and transport
//! tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::backend::{AudioError, Backend};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(String),
    Play(String, Duration),
    FadeOut(String, Duration),
    SetVolume(f32),
    PauseAll,
    ResumeAll,
    FadeOutAll(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FakeSound(pub(crate) String);

#[derive(Default)]
pub(crate) struct FakeBackend {
    calls: RefCell<Vec<Call>>,
    broken: HashSet<String>,
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make loading any file with this name fail.
    pub(crate) fn with_broken(mut self, name: &str) -> Self {
        self.broken.insert(name.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Names passed to `play`, in order.
    pub(crate) fn played(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Play(name, _) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn loads(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Load(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_volume(&self) -> Option<f32> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            Call::SetVolume(v) => Some(*v),
            _ => None,
        })
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Backend for FakeBackend {
    type Sound = FakeSound;

    fn load(&self, path: &Path) -> Result<FakeSound, AudioError> {
        let name = name_of(path);
        self.record(Call::Load(name.clone()));
        if self.broken.contains(&name) {
            return Err(AudioError::Open {
                path: PathBuf::from(path),
                source: io::Error::new(io::ErrorKind::InvalidData, "unrecognized format"),
            });
        }
        Ok(FakeSound(name))
    }

    fn play(&self, sound: &FakeSound, fade_in: Duration) -> Result<(), AudioError> {
        self.record(Call::Play(sound.0.clone(), fade_in));
        Ok(())
    }

    fn fade_out(&self, sound: &FakeSound, fade: Duration) -> Result<(), AudioError> {
        self.record(Call::FadeOut(sound.0.clone(), fade));
        Ok(())
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        self.record(Call::SetVolume(level));
        Ok(())
    }

    fn pause_all(&self) -> Result<(), AudioError> {
        self.record(Call::PauseAll);
        Ok(())
    }

    fn resume_all(&self) -> Result<(), AudioError> {
        self.record(Call::ResumeAll);
        Ok(())
    }

    fn fade_out_all(&self, fade: Duration) -> Result<(), AudioError> {
        self.record(Call::FadeOutAll(fade));
        Ok(())
    }
}
