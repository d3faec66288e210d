use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::debug;

/// Raw mode and a hidden cursor for as long as the guard lives. Dropping it
/// restores both, including while unwinding from a panic.
pub struct TerminalGuard {
    raw: bool,
    cursor_hidden: bool,
}

impl TerminalGuard {
    pub fn acquire(raw: bool, hide_cursor: bool) -> io::Result<Self> {
        let mut guard = Self {
            raw: false,
            cursor_hidden: false,
        };
        if raw {
            enable_raw_mode()?;
            guard.raw = true;
        }
        if hide_cursor {
            execute!(io::stdout(), Hide)?;
            guard.cursor_hidden = true;
        }
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw {
            if let Err(e) = disable_raw_mode() {
                debug!("could not leave raw mode: {e}");
            }
        }
        if self.cursor_hidden {
            if let Err(e) = execute!(io::stdout(), Show) {
                debug!("could not show cursor: {e}");
            }
        }
    }
}
