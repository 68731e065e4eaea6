use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::audio::{read_wav, AudioBuffer};
use crate::config::ProviderSettings;

pub mod providers;

pub use providers::{OpenAIProvider, TranscriptionProvider, WhisperCppProvider};

pub const SUPPORTED_PROVIDERS: [&str; 2] = ["openai-api", "whisper-cpp"];

pub struct Transcriber {
    provider: Box<dyn TranscriptionProvider>,
    language: String,
}

impl Transcriber {
    pub fn with_provider(provider_name: &str, config: ProviderConfig) -> Result<Self> {
        let language = config.language.clone().unwrap_or_else(|| "en".to_string());

        let provider: Box<dyn TranscriptionProvider> = match provider_name {
            "openai-api" => {
                let model = config.model.unwrap_or_else(|| "whisper-1".to_string());
                Box::new(OpenAIProvider::new(
                    config.api_key,
                    config.api_endpoint,
                    model,
                )?)
            }
            "whisper-cpp" => Box::new(WhisperCppProvider::new(
                config.command_path,
                config.model_path,
            )?),
            _ => bail!(
                "Unknown transcription provider '{}'. Supported providers: {}",
                provider_name,
                SUPPORTED_PROVIDERS.join(", ")
            ),
        };

        info!("Using {} for transcription", provider.name());

        Ok(Self { provider, language })
    }

    /// Build a transcriber from the `[provider]` config section.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self> {
        let provider_name = settings
            .name
            .as_deref()
            .context("No transcription provider configured")?;
        Self::with_provider(provider_name, ProviderConfig::from(settings))
    }

    pub async fn transcribe(&self, audio: &AudioBuffer) -> Result<String> {
        self.provider.transcribe(audio, &self.language).await
    }

    pub fn provider(&self) -> &dyn TranscriptionProvider {
        self.provider.as_ref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub model: Option<String>,
    pub model_path: Option<String>,
    pub language: Option<String>,
    pub command_path: Option<String>,
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: None,
            model_path: None,
            language: Some("en".to_string()),
            command_path: None,
            api_endpoint: None,
            api_key: None,
        }
    }
}

impl From<&ProviderSettings> for ProviderConfig {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            model: settings.model.clone(),
            model_path: settings.model_path.clone(),
            language: settings.language.clone(),
            command_path: settings.command_path.clone(),
            api_endpoint: settings.api_endpoint.clone(),
            api_key: settings.api_key.clone(),
        }
    }
}

// ============================================================================
// Provider status and validation
// ============================================================================

/// Status of the transcription provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderStatus {
    /// Provider is configured and ready
    Ready {
        provider: String,
        model: Option<String>,
        language: Option<String>,
    },
    /// Provider is configured but validation failed
    ConfigError { provider: String, error: String },
    /// No provider configured
    NotConfigured,
}

/// Result of testing a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderTestResult {
    pub success: bool,
    pub transcription: Option<String>,
    pub error: Option<String>,
    pub duration_secs: f64,
}

/// Get provider status from the `[provider]` config section.
pub fn get_provider_status(settings: &ProviderSettings) -> ProviderStatus {
    let provider = match &settings.name {
        Some(p) if !p.is_empty() => p.clone(),
        _ => return ProviderStatus::NotConfigured,
    };

    if let Some(error) = validate_provider_config(&provider, settings) {
        return ProviderStatus::ConfigError { provider, error };
    }

    match Transcriber::with_provider(&provider, ProviderConfig::from(settings)) {
        Ok(transcriber) if !transcriber.provider().is_available() => ProviderStatus::ConfigError {
            provider,
            error: format!(
                "{} is configured but its binary or model file is missing",
                transcriber.provider().name()
            ),
        },
        Ok(_) => ProviderStatus::Ready {
            provider,
            model: settings.model.clone(),
            language: settings.language.clone(),
        },
        Err(e) => ProviderStatus::ConfigError {
            provider,
            error: e.to_string(),
        },
    }
}

/// Validate provider configuration and return an error message if invalid.
pub fn validate_provider_config(provider: &str, settings: &ProviderSettings) -> Option<String> {
    match provider {
        "openai-api" => {
            if settings.api_key.is_none() && settings.api_endpoint.is_none() {
                Some("API key or a local api_endpoint required for OpenAI API".to_string())
            } else {
                None
            }
        }
        "whisper-cpp" => {
            if settings.model_path.is_none() {
                Some("Model path required for whisper.cpp".to_string())
            } else {
                None
            }
        }
        _ => Some(format!("Unknown provider: {}", provider)),
    }
}

/// Test a provider, optionally transcribing a WAV file.
///
/// If no file is provided, only validates that the provider can be initialized.
pub async fn test_provider_with_config(
    settings: &ProviderSettings,
    audio_file: Option<&Path>,
) -> Result<ProviderTestResult> {
    let transcriber = match Transcriber::from_settings(settings) {
        Ok(t) => t,
        Err(e) => {
            return Ok(ProviderTestResult {
                success: false,
                transcription: None,
                error: Some(e.to_string()),
                duration_secs: 0.0,
            });
        }
    };

    if !transcriber.provider().is_available() {
        return Ok(ProviderTestResult {
            success: false,
            transcription: None,
            error: Some(format!(
                "{} binary or model file not found",
                transcriber.provider().name()
            )),
            duration_secs: 0.0,
        });
    }

    let Some(path) = audio_file else {
        return Ok(ProviderTestResult {
            success: true,
            transcription: None,
            error: None,
            duration_secs: 0.0,
        });
    };

    let audio = read_wav(path)?;
    let start = std::time::Instant::now();
    let result = match transcriber.transcribe(&audio).await {
        Ok(text) => ProviderTestResult {
            success: true,
            transcription: Some(text),
            error: None,
            duration_secs: start.elapsed().as_secs_f64(),
        },
        Err(e) => ProviderTestResult {
            success: false,
            transcription: None,
            error: Some(e.to_string()),
            duration_secs: start.elapsed().as_secs_f64(),
        },
    };

    Ok(result)
}

/// Summary of the current provider configuration, safe to print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub api_endpoint: Option<String>,
    pub has_api_key: bool,
    pub command_path: Option<String>,
    pub model_path: Option<String>,
}

pub fn get_provider_info(settings: &ProviderSettings) -> ProviderInfo {
    ProviderInfo {
        provider: settings.name.clone(),
        model: settings.model.clone(),
        language: settings.language.clone(),
        api_endpoint: settings.api_endpoint.clone(),
        has_api_key: settings.api_key.is_some(),
        command_path: settings.command_path.clone(),
        model_path: settings.model_path.clone(),
    }
}
