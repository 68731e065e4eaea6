//! Train/test manifest preparation from one or more source corpora.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use super::{CorpusError, ManifestEntry};

/// Transcripts known to be truncated, foreign-language or otherwise unusable
/// in the ATCO2 / UWB-ATCC sources.
pub const DEFAULT_EXCLUDED_TEXTS: &[&str] = &[
    "ing echo then direct direct",
    "one",
    "standby",
    "is now ready for depa",
    "roger",
    "praha mike",
    "calibra",
    "romeo",
    "three nine zer",
    "praha",
    "two zero push approved",
    "merci au plaisir aurevoir",
    "boeing",
    "praha luftha",
    "four five",
    "decimal three",
    "ils one three",
    "sky travel",
    "cali",
    "course omelo",
    "maintain present heading one descend five thousand",
    "fedex five six",
    "tower five one",
    "one five zero two",
    "follow airbus",
    "black sea",
    "ils",
    "thomson one zero alfa",
    "when ready",
    "calibra ground",
    "our seven five",
    "to the left and the ground",
    "potvrzuju",
    "expedite",
    "irm",
    "lufthansa four tango papa",
    "push app",
    "seven nine o",
    "india november",
    "three eight whiskey ground",
    "medium",
    "oscar india november",
    "flight level",
    "tower oscar kilo",
    "with high speed",
    "oscar yankee romeo november",
    "and hold two two",
    "vfr traffic",
    "cleared to land",
    "two is holding short",
    "runway one",
    "sky",
    "k klm",
    "understood",
    "number one golf bravo",
    "but",
];

#[derive(Debug, Clone)]
pub struct PrepareOptions {
    pub seed: u64,
    /// Share of the shuffled corpus assigned to the test split; rounded up.
    pub test_fraction: f64,
    pub excluded_texts: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetSplit {
    pub train: Vec<ManifestEntry>,
    pub test: Vec<ManifestEntry>,
    /// Entries removed because their transcript is excluded.
    pub dropped: usize,
}

/// Shuffle the combined corpus, split it, then drop excluded transcripts from
/// both sides. The same seed and input always give the same split.
pub fn prepare(
    mut entries: Vec<ManifestEntry>,
    options: &PrepareOptions,
) -> Result<DatasetSplit, CorpusError> {
    if !(0.0..=1.0).contains(&options.test_fraction) {
        return Err(CorpusError::InvalidTestFraction(options.test_fraction));
    }

    let total = entries.len();
    let mut rng = StdRng::seed_from_u64(options.seed);
    entries.shuffle(&mut rng);

    let test_len = (total as f64 * options.test_fraction).ceil() as usize;
    let train = entries.split_off(test_len.min(total));
    let test = entries;

    let excluded: HashSet<&str> = options.excluded_texts.iter().map(String::as_str).collect();
    let keep = |entry: &ManifestEntry| !excluded.contains(entry.text.as_str());

    let train: Vec<ManifestEntry> = train.into_iter().filter(keep).collect();
    let test: Vec<ManifestEntry> = test.into_iter().filter(keep).collect();
    let dropped = total - train.len() - test.len();

    info!(
        "Prepared dataset: {} train, {} test, {} dropped (seed {})",
        train.len(),
        test.len(),
        dropped,
        options.seed
    );

    Ok(DatasetSplit {
        train,
        test,
        dropped,
    })
}
