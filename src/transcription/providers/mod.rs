use anyhow::Result;
use std::future::Future;
use std::pin::Pin;

use crate::audio::AudioBuffer;

pub mod openai_api;
pub mod whisper_cpp;

pub use openai_api::OpenAIProvider;
pub use whisper_cpp::WhisperCppProvider;

/// Boundary to an external speech model: audio in, raw text out.
///
/// Audio is handed over in memory; a provider that can only read files is
/// responsible for any temporary file it needs.
pub trait TranscriptionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    fn transcribe<'a>(
        &'a self,
        audio: &'a AudioBuffer,
        language: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}
