use std::io::{self, ErrorKind};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod audio;
mod cache;
mod catalog;
mod cli;
mod config;
mod error;
mod fetch;
mod runtime;
mod scheduler;
mod transport;
mod ui;

use cli::Args;
use error::Error;

fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("AMBIENCE_LOG").unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.version {
        println!("{}", runtime::version_line());
        return ExitCode::SUCCESS;
    }

    init_tracing(args.quiet);

    match runtime::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::EmptyCatalog) => {
            println!("No sound files to load!");
            println!("Use ambience --fetch-library to download sound library.");
            ExitCode::FAILURE
        }
        Err(Error::Io(e)) if matches!(e.kind(), ErrorKind::BrokenPipe | ErrorKind::Interrupted) => {
            debug!("output closed: {e}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ambience: {e}");
            ExitCode::FAILURE
        }
    }
}
