use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use tracing::debug;

use crate::audio::Backend;
use crate::config;
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::transport::{Command, Flow, TransportController};
use crate::ui::{DisplayPresenter, StatusLine, StatusView};

/// Upper bound on one wait, so an interrupt is noticed promptly.
const MAX_WAIT: Duration = Duration::from_millis(100);

/// Run until quit or interrupt. Each cycle either fires a due tick or waits
/// for input no longer than the time left to the next tick, so ticks and
/// commands never interleave.
pub fn run<B: Backend>(
    scheduler: &mut Scheduler<B>,
    settings: &config::Settings,
    mut status: Option<StatusLine>,
    read_input: bool,
    interrupted: &AtomicBool,
) -> Result<()> {
    let transport = TransportController::new(settings.playback.volume_step);
    let mut presenter = DisplayPresenter::new(&settings.ui.spinner);
    let interval = scheduler.timing().tick_interval();
    let mut next_tick = Instant::now() + interval;

    redraw(&mut status, &mut presenter, scheduler);

    let result = loop {
        if interrupted.load(Ordering::SeqCst) {
            debug!("interrupted");
            break Ok(());
        }

        let now = Instant::now();
        if now >= next_tick {
            if let Err(e) = scheduler.tick() {
                break Err(e);
            }
            redraw(&mut status, &mut presenter, scheduler);
            next_tick += interval;
            if next_tick <= now {
                // Fell far behind (suspended?): don't replay missed ticks.
                next_tick = now + interval;
            }
            continue;
        }

        let wait = (next_tick - now).min(MAX_WAIT);
        if !read_input {
            thread::sleep(wait);
            continue;
        }

        let cmd = match poll_command(wait) {
            Ok(cmd) => cmd,
            Err(e) => break Err(e.into()),
        };
        if let Some(cmd) = cmd {
            match transport.dispatch(cmd, scheduler) {
                Ok(Flow::Quit) => break Ok(()),
                Ok(Flow::Continue) => redraw(&mut status, &mut presenter, scheduler),
                Err(e) => break Err(e),
            }
        }
    };

    if let Some(line) = status {
        if let Err(e) = line.finish() {
            debug!("could not clear status line: {e}");
        }
    }
    result
}

fn poll_command(timeout: Duration) -> io::Result<Option<Command>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(Command::from_key(key)),
        _ => Ok(None),
    }
}

/// Draw the current state. A terminal that stops accepting output only
/// loses its status line; playback goes on.
fn redraw<B: Backend>(
    status: &mut Option<StatusLine>,
    presenter: &mut DisplayPresenter,
    scheduler: &Scheduler<B>,
) {
    let Some(line) = status.as_mut() else {
        return;
    };
    let Some(track) = scheduler.current_track() else {
        return;
    };
    let session = scheduler.session();
    let view = StatusView {
        track_name: &track.name,
        volume: session.volume,
        muted: session.muted,
        paused: session.paused,
        elapsed: session.elapsed(),
    };
    if let Err(e) = line.draw(&presenter.render(&view)) {
        debug!("status line disabled: {e}");
        *status = None;
    }
}
