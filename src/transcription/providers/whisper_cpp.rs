use anyhow::{bail, Context, Result};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::process::Command;
use tracing::{debug, info};

use super::TranscriptionProvider;
use crate::audio::{write_wav, AudioBuffer, WHISPER_SAMPLE_RATE};
use crate::normalizer::{TranscriptionNormalizer, WhisperCppOutputCleaner};

const BINARY_CANDIDATES: [&str; 3] = ["whisper-cli", "whisper-cpp", "main"];

/// Runs a local whisper.cpp binary against a ggml model.
///
/// The binary only reads audio from disk, so each sample is written to a
/// temporary 16 kHz WAV that is removed once the process exits.
pub struct WhisperCppProvider {
    command_path: PathBuf,
    model_path: PathBuf,
    cleaner: WhisperCppOutputCleaner,
}

impl WhisperCppProvider {
    pub fn new(command_path: Option<String>, model_path: Option<String>) -> Result<Self> {
        let command_path = match command_path {
            Some(path) => PathBuf::from(path),
            None => find_binary().context(
                "whisper.cpp binary not found in PATH; set command_path in the provider config",
            )?,
        };

        let model_path = model_path
            .map(PathBuf::from)
            .context("model_path is required for the whisper.cpp provider")?;

        info!(
            "Initialized whisper.cpp provider: {:?} with model {:?}",
            command_path, model_path
        );

        Ok(Self {
            command_path,
            model_path,
            cleaner: WhisperCppOutputCleaner::new()?,
        })
    }
}

fn find_binary() -> Option<PathBuf> {
    BINARY_CANDIDATES
        .iter()
        .find_map(|candidate| which::which(candidate).ok())
}

impl TranscriptionProvider for WhisperCppProvider {
    fn name(&self) -> &'static str {
        "whisper.cpp"
    }

    fn is_available(&self) -> bool {
        self.command_path.exists() && self.model_path.exists()
    }

    fn transcribe<'a>(
        &'a self,
        audio: &'a AudioBuffer,
        language: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let wav_file = tempfile::Builder::new()
                .prefix("atc-eval-")
                .suffix(".wav")
                .tempfile()
                .context("Failed to create temporary WAV file")?;
            write_wav(wav_file.path(), &audio.resampled(WHISPER_SAMPLE_RATE))?;

            debug!("Running {:?} on {:?}", self.command_path, wav_file.path());

            let output = Command::new(&self.command_path)
                .arg("-m")
                .arg(&self.model_path)
                .arg("-f")
                .arg(wav_file.path())
                .arg("-l")
                .arg(language)
                .arg("--no-prints")
                .output()
                .await
                .with_context(|| format!("Failed to run {:?}", self.command_path))?;

            if !output.status.success() {
                bail!(
                    "whisper.cpp exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(self.cleaner.normalize(&stdout))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path_is_required() {
        let result = WhisperCppProvider::new(Some("/usr/bin/true".to_string()), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_unavailable_when_files_missing() {
        let provider = WhisperCppProvider::new(
            Some("/nonexistent/whisper-cli".to_string()),
            Some("/nonexistent/ggml-medium.en.bin".to_string()),
        )
        .unwrap();
        assert!(!provider.is_available());
    }
}
