use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::normalizer::{AtcNormalizer, TranscriptionNormalizer, TrimNormalizer};

/// Which normalizer to apply to raw hypotheses before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerKind {
    /// Full ATC rewrite rules (pretrained models)
    Atc,
    /// Whitespace trimming only (models fine-tuned on the references)
    Trim,
}

impl fmt::Display for NormalizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizerKind::Atc => write!(f, "atc"),
            NormalizerKind::Trim => write!(f, "trim"),
        }
    }
}

/// Enum to hold the available normalizers
pub enum Normalizer {
    Atc(AtcNormalizer),
    Trim(TrimNormalizer),
}

impl Normalizer {
    pub fn create(kind: NormalizerKind) -> Result<Self> {
        match kind {
            NormalizerKind::Atc => {
                info!("Creating ATC normalizer");
                Ok(Normalizer::Atc(AtcNormalizer::new()?))
            }
            NormalizerKind::Trim => {
                info!("Creating trim normalizer");
                Ok(Normalizer::Trim(TrimNormalizer::new()))
            }
        }
    }

    /// Run normalization using the selected normalizer
    pub fn run(&self, raw_output: &str) -> String {
        match self {
            Normalizer::Atc(n) => {
                debug!("Running {}", n.name());
                n.normalize(raw_output)
            }
            Normalizer::Trim(n) => {
                debug!("Running {}", n.name());
                n.normalize(raw_output)
            }
        }
    }
}

impl TranscriptionNormalizer for Normalizer {
    fn normalize(&self, raw_output: &str) -> String {
        self.run(raw_output)
    }

    fn name(&self) -> &'static str {
        match self {
            Normalizer::Atc(n) => n.name(),
            Normalizer::Trim(n) => n.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_atc() {
        let normalizer = Normalizer::create(NormalizerKind::Atc).unwrap();
        assert_eq!(normalizer.name(), "AtcNormalizer");
        assert_eq!(normalizer.run(" FL350 "), " flight level three five zero ");
    }

    #[test]
    fn test_create_trim() {
        let normalizer = Normalizer::create(NormalizerKind::Trim).unwrap();
        assert_eq!(normalizer.name(), "TrimNormalizer");
        assert_eq!(normalizer.normalize(" FL350 "), "FL350");
    }

    #[test]
    fn test_kind_display_matches_serde_name() {
        assert_eq!(NormalizerKind::Atc.to_string(), "atc");
        assert_eq!(
            serde_json::to_string(&NormalizerKind::Trim).unwrap(),
            "\"trim\""
        );
    }
}
