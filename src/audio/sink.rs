//! Utilities for decoding files and wiring them into `rodio` sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::source::Buffered;
use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use super::backend::AudioError;

/// A decoded file. Cloning shares the decoded samples.
pub(crate) type DecodedSource = Buffered<Decoder<BufReader<File>>>;

/// Open and decode `path`. Unsupported or corrupt files fail here rather than
/// when the sound is first played.
pub(super) fn decode(path: &Path) -> Result<DecodedSource, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(decoder.buffered())
}

/// Create a silent sink that loops `source` forever.
pub(super) fn create_looping_sink(mixer: &Mixer, source: DecodedSource) -> Sink {
    let sink = Sink::connect_new(mixer);
    sink.set_volume(0.0);
    sink.append(source.repeat_infinite());
    sink.play();
    sink
}
