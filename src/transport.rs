//! Maps key presses to playback commands and applies them.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::audio::Backend;
use crate::error::Result;
use crate::scheduler::{Direction, Scheduler};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    TogglePause,
    Quit,
}

impl Command {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            // Raw mode swallows SIGINT; Ctrl-C arrives as a key instead.
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => Some(Self::Quit),
                _ => None,
            };
        }
        match key.code {
            KeyCode::Char('n') => Some(Self::Next),
            KeyCode::Char('p') => Some(Self::Previous),
            KeyCode::Char(']') => Some(Self::VolumeUp),
            KeyCode::Char('[') => Some(Self::VolumeDown),
            KeyCode::Char('m') => Some(Self::ToggleMute),
            KeyCode::Char('s') => Some(Self::TogglePause),
            KeyCode::Char('q') => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies commands to the scheduler. Holds configuration only; all state
/// lives in the scheduler's session.
#[derive(Debug, Clone)]
pub struct TransportController {
    volume_step: f32,
}

impl TransportController {
    pub fn new(volume_step: f32) -> Self {
        Self { volume_step }
    }

    pub fn dispatch<B: Backend>(&self, cmd: Command, scheduler: &mut Scheduler<B>) -> Result<Flow> {
        debug!(?cmd, "command");
        match cmd {
            Command::Next => {
                scheduler.set_paused(false);
                scheduler.skip(Direction::Forward)?;
            }
            Command::Previous => {
                scheduler.set_paused(false);
                scheduler.skip(Direction::Backward)?;
            }
            Command::VolumeUp => scheduler.increase_volume(self.volume_step),
            Command::VolumeDown => scheduler.decrease_volume(self.volume_step),
            Command::ToggleMute => scheduler.toggle_mute(),
            Command::TogglePause => scheduler.toggle_pause(),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::audio::fake::{Call, FakeBackend};
    use crate::catalog::Catalog;
    use crate::config::PlaybackSettings;
    use crate::scheduler::FadeTiming;

    fn running(names: &[&str]) -> Scheduler<FakeBackend> {
        let catalog = Catalog::from_paths(names.iter().map(PathBuf::from).collect()).unwrap();
        let timing = FadeTiming::new(&PlaybackSettings::default());
        let mut s = Scheduler::new(catalog, FakeBackend::new(), timing).unwrap();
        s.start().unwrap();
        s.backend().clear();
        s
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from_key(key('n')), Some(Command::Next));
        assert_eq!(Command::from_key(key('p')), Some(Command::Previous));
        assert_eq!(Command::from_key(key('[')), Some(Command::VolumeDown));
        assert_eq!(Command::from_key(key(']')), Some(Command::VolumeUp));
        assert_eq!(Command::from_key(key('m')), Some(Command::ToggleMute));
        assert_eq!(Command::from_key(key('s')), Some(Command::TogglePause));
        assert_eq!(Command::from_key(key('q')), Some(Command::Quit));
        assert_eq!(Command::from_key(key('x')), None);
        assert_eq!(
            Command::from_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(
            Command::from_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn next_unpauses_and_skips() {
        let mut s = running(&["a.ogg", "b.ogg"]);
        let transport = TransportController::new(0.05);

        transport.dispatch(Command::TogglePause, &mut s).unwrap();
        assert!(s.session().paused);

        let flow = transport.dispatch(Command::Next, &mut s).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(!s.session().paused);
        assert_eq!(s.current_track().unwrap().name, "b.ogg");
        assert_eq!(
            s.backend().calls(),
            vec![
                Call::PauseAll,
                Call::ResumeAll,
                Call::Load("b.ogg".into()),
                Call::FadeOut("a.ogg".into(), Duration::from_secs(1)),
                Call::Play("b.ogg".into(), Duration::from_secs(1)),
            ]
        );
    }

    #[test]
    fn rapid_commands_are_all_applied() {
        let mut s = running(&["a.ogg", "b.ogg", "c.ogg"]);
        let transport = TransportController::new(0.05);

        for _ in 0..30 {
            transport.dispatch(Command::VolumeUp, &mut s).unwrap();
        }
        assert_eq!(s.session().volume, 1.0);

        for _ in 0..3 {
            transport.dispatch(Command::VolumeDown, &mut s).unwrap();
        }
        assert_eq!(s.session().volume, 0.85);

        transport.dispatch(Command::ToggleMute, &mut s).unwrap();
        transport.dispatch(Command::ToggleMute, &mut s).unwrap();
        assert_eq!(s.backend().last_volume(), Some(0.85));

        transport.dispatch(Command::Previous, &mut s).unwrap();
        transport.dispatch(Command::Previous, &mut s).unwrap();
        transport.dispatch(Command::Next, &mut s).unwrap();
        assert_eq!(s.current_track().unwrap().name, "c.ogg");
    }

    #[test]
    fn quit_stops_the_loop_without_touching_playback() {
        let mut s = running(&["a.ogg"]);
        let flow = TransportController::new(0.05)
            .dispatch(Command::Quit, &mut s)
            .unwrap();
        assert_eq!(flow, Flow::Quit);
        assert!(s.backend().calls().is_empty());
    }
}
