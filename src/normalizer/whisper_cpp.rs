use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::normalizer::TranscriptionNormalizer;

/// Joins whisper.cpp CLI output into one line, dropping segment timestamps.
///
/// This only cleans the provider's output format; the ATC rules still run
/// afterwards during evaluation.
pub struct WhisperCppOutputCleaner {
    timestamp_regex: Regex,
}

impl WhisperCppOutputCleaner {
    pub fn new() -> Result<Self> {
        // Matches timestamps like [00:00:00.000 --> 00:00:03.280] or [00:00:00:000 --> 00:00:03:280]
        let timestamp_regex =
            Regex::new(r"\[\d{2}:\d{2}:\d{2}[:.]\d{3}\s*-->\s*\d{2}:\d{2}:\d{2}[:.]\d{3}\]\s*")?;

        Ok(Self { timestamp_regex })
    }
}

impl TranscriptionNormalizer for WhisperCppOutputCleaner {
    fn normalize(&self, raw_output: &str) -> String {
        let segments: Vec<String> = raw_output
            .lines()
            .map(|line| self.timestamp_regex.replace_all(line, "").trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        let result = segments.join(" ");
        debug!(
            "Joined {} whisper.cpp segments into {} chars",
            segments.len(),
            result.len()
        );

        result
    }

    fn name(&self) -> &'static str {
        "WhisperCppOutputCleaner"
    }
}
