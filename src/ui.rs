//! Status line rendering.
//!
//! [`DisplayPresenter`] turns the session into one line of text and has no
//! side effects besides advancing its spinner. [`StatusLine`] puts that text
//! on the terminal.

mod status_line;

use std::time::Duration;

pub use status_line::StatusLine;

const DEFAULT_SPINNER: &str = "◐◓◑◒";

/// Everything the status line shows, borrowed from the scheduler.
#[derive(Debug, Clone, Copy)]
pub struct StatusView<'a> {
    pub track_name: &'a str,
    pub volume: f32,
    pub muted: bool,
    pub paused: bool,
    pub elapsed: Duration,
}

pub struct DisplayPresenter {
    frames: Vec<char>,
    position: usize,
}

impl DisplayPresenter {
    pub fn new(spinner: &str) -> Self {
        let mut frames: Vec<char> = spinner.chars().filter(|c| !c.is_whitespace()).collect();
        if frames.is_empty() {
            frames = DEFAULT_SPINNER.chars().collect();
        }
        Self { frames, position: 0 }
    }

    /// Render the next status line. The spinner only moves while playing.
    pub fn render(&mut self, view: &StatusView<'_>) -> String {
        if view.paused {
            return "⏸ [paused] (Press 's' to unpause)".to_string();
        }

        self.position = (self.position + 1) % self.frames.len();
        let frame = self.frames[self.position];

        let mut line = format!("▶ Playing {} {}", view.track_name, frame);
        if let Some(label) = volume_label(view.volume, view.muted) {
            line.push(' ');
            line.push_str(&label);
        }
        line.push(' ');
        line.push_str(&format_elapsed(view.elapsed));
        line
    }
}

fn volume_label(volume: f32, muted: bool) -> Option<String> {
    if muted {
        Some("[mute]".to_string())
    } else if volume < 1.0 {
        Some(format!("vol: {}%", (volume * 100.0).round() as u32))
    } else {
        None
    }
}

/// Format a `Duration` as `MM:SS`, or `HH:MM:SS` from the first hour on.
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 {
        format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
    } else {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
