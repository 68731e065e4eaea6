//! Labeled test corpora: manifests, decoded samples and dataset preparation.

use std::path::PathBuf;
use thiserror::Error;

mod manifest;
mod prepare;

pub use manifest::{load_samples, read_manifest, write_manifest, ManifestEntry, Sample};
pub use prepare::{prepare, DatasetSplit, PrepareOptions, DEFAULT_EXCLUDED_TEXTS};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: malformed manifest entry: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("audio for entry {entry} not found: {audio}")]
    MissingAudio { entry: usize, audio: PathBuf },
    #[error("invalid test fraction {0}, expected a value between 0 and 1")]
    InvalidTestFraction(f64),
}
