use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::audio::AudioPlayer;
use crate::catalog;
use crate::cli::Args;
use crate::error::Result;
use crate::fetch;
use crate::scheduler::{FadeTiming, Scheduler};
use crate::ui::StatusLine;

mod event_loop;
mod settings;
mod startup;
mod terminal;

pub use startup::version_line;

use terminal::TerminalGuard;

pub fn run(args: &Args) -> Result<()> {
    let mut settings = settings::load_settings();
    settings::apply_args(&mut settings, args);

    if args.fetch_library {
        return fetch::run(&settings.fetch);
    }

    let quiet = args.quiet;
    let stdout = io::stdout();

    if !quiet {
        writeln!(stdout.lock(), "{}", version_line())?;
    }
    let roots = startup::sound_roots(args, &settings.library, quiet, &mut stdout.lock())?;
    if !quiet {
        startup::print_roots(&roots, &mut stdout.lock())?;
    }

    let catalog = catalog::build(&roots, &settings.library, &mut rand::thread_rng())?;
    if settings.ui.show_sound_list {
        startup::print_listing(&catalog, &roots, &mut stdout.lock())?;
    }

    let player = AudioPlayer::new()?;
    let timing = FadeTiming::new(&settings.playback);
    let mut scheduler = Scheduler::new(catalog, player, timing)?;

    if settings.playback.preload_all {
        startup::preload(&mut scheduler, quiet, &mut stdout.lock())?;
    }
    debug!(
        sounds = scheduler.catalog().len(),
        play_ticks = scheduler.timing().play_ticks(),
        fade = ?scheduler.timing().fade_duration(),
        "ready"
    );

    let read_input = !args.noinput && io::stdin().is_terminal();
    if !quiet {
        startup::print_key_help(read_input, &mut stdout.lock())?;
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            warn!("could not install Ctrl-C handler: {e}");
        }
    }

    let stdout_tty = stdout.is_terminal();
    let guard = TerminalGuard::acquire(read_input, stdout_tty)?;

    scheduler.start()?;

    let status = if stdout_tty && !quiet {
        match StatusLine::new() {
            Ok(line) => Some(line),
            Err(e) => {
                warn!("no status line: {e}");
                None
            }
        }
    } else {
        None
    };

    let loop_result = event_loop::run(&mut scheduler, &settings, status, read_input, &interrupted);
    drop(guard);

    say(quiet, "\nStopping sounds...");
    scheduler.shutdown(Duration::from_millis(settings.playback.shutdown_fade_ms));
    say(quiet, "Goodbye.");

    loop_result
}

/// Print a shutdown message. The terminal may already be gone at this point,
/// so failures are only logged.
fn say(quiet: bool, msg: &str) {
    if quiet {
        return;
    }
    let mut out = io::stdout().lock();
    if let Err(e) = writeln!(out, "{msg}").and_then(|_| out.flush()) {
        debug!("could not write to stdout: {e}");
    }
}
