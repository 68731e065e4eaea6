pub mod atc;
mod normalizer;
mod transcription_normalizer;
mod trim;
mod whisper_cpp;

pub use atc::AtcNormalizer;
pub use normalizer::{Normalizer, NormalizerKind};
pub use transcription_normalizer::TranscriptionNormalizer;
pub use trim::TrimNormalizer;
pub use whisper_cpp::WhisperCppOutputCleaner;
