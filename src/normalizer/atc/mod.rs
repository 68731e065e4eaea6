//! ATC transcription normalizer.
//!
//! Turns free-form model output into the lowercase spelled-out form used by
//! the reference transcripts, so that word error rate compares words rather
//! than formatting. The rules run in a fixed order over the evolving string:
//! flight levels and altitudes are rewritten before generic alphanumeric and
//! digit handling can consume them, and the case-sensitive `take off` match
//! runs before lowercasing.

use anyhow::Result;
use tracing::trace;

use crate::normalizer::TranscriptionNormalizer;

pub mod rules;
pub mod spelling;

use rules::{
    AlphanumericRule, AltitudeRule, FlightLevelRule, HyphenatedCodeRule, LowercaseRule,
    NumberRule, RewriteRule, SingleLetterRule, StrayPeriodRule, StripPunctuationRule,
    TakeoffRule,
};

pub struct AtcNormalizer {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl AtcNormalizer {
    pub fn new() -> Result<Self> {
        let rules: Vec<Box<dyn RewriteRule>> = vec![
            Box::new(FlightLevelRule::new()?),
            Box::new(AltitudeRule::new()?),
            Box::new(HyphenatedCodeRule::new()?),
            Box::new(AlphanumericRule::new()?),
            Box::new(NumberRule::new()?),
            Box::new(SingleLetterRule),
            Box::new(StrayPeriodRule),
            Box::new(TakeoffRule),
            Box::new(StripPunctuationRule),
            Box::new(LowercaseRule),
        ];

        Ok(Self { rules })
    }

    /// Names of the rules in the order they are applied.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl TranscriptionNormalizer for AtcNormalizer {
    fn normalize(&self, raw_output: &str) -> String {
        self.rules
            .iter()
            .fold(raw_output.to_string(), |text, rule| {
                let rewritten = rule.apply(&text);
                if rewritten != text {
                    trace!("{}: {:?} -> {:?}", rule.name(), text, rewritten);
                }
                rewritten
            })
    }

    fn name(&self) -> &'static str {
        "AtcNormalizer"
    }
}
