use std::io::{self, Stdout};

use ratatui::widgets::Paragraph;
use ratatui::{Terminal, TerminalOptions, Viewport, backend::CrosstermBackend};

/// A one-row inline viewport that is redrawn in place every tick.
pub struct StatusLine {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl StatusLine {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(1),
            },
        )?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, line: &str) -> io::Result<()> {
        self.terminal.draw(|f| {
            f.render_widget(Paragraph::new(line), f.area());
        })?;
        Ok(())
    }

    /// Blank the line so later output starts on a clean row.
    pub fn finish(mut self) -> io::Result<()> {
        self.terminal.clear()?;
        Ok(())
    }
}
