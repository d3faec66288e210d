use std::path::PathBuf;

use clap::Parser;

/// Ambient soundscape player: plays each sound for a while, then crossfades
/// into the next one, forever.
#[derive(Parser, Debug, Default)]
#[command(name = "ambience", disable_version_flag = true)]
pub struct Args {
    /// Minutes each sound plays by itself [default: 5]
    #[arg(short, long, value_name = "MINUTES")]
    pub duration: Option<f64>,

    /// Verify the local sound library and download missing files
    #[arg(short, long)]
    pub fetch_library: bool,

    /// Don't decode every sound before playback starts
    #[arg(short = 'i', long)]
    pub noinit: bool,

    /// Don't read keyboard input
    #[arg(short, long)]
    pub noinput: bool,

    /// Directory to read sounds from
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print version and exit
    #[arg(short, long)]
    pub version: bool,

    /// Sound files or directories to play
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,
}

impl Args {
    /// Paths to scan: positional arguments win over `--path`.
    pub fn sound_paths(&self) -> Option<Vec<PathBuf>> {
        if !self.paths.is_empty() {
            Some(self.paths.clone())
        } else {
            self.path.clone().map(|p| vec![p])
        }
    }
}
