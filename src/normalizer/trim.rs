use crate::normalizer::TranscriptionNormalizer;

/// Leaves model output as-is apart from surrounding whitespace.
///
/// Used for models fine-tuned on the reference transcripts, whose output
/// already follows the spelled-out conventions.
pub struct TrimNormalizer;

impl Default for TrimNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrimNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl TranscriptionNormalizer for TrimNormalizer {
    fn normalize(&self, raw_output: &str) -> String {
        raw_output.trim().to_string()
    }

    fn name(&self) -> &'static str {
        "TrimNormalizer"
    }
}
