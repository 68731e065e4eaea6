use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, error, info};

use super::TranscriptionProvider;
use crate::audio::{encode_wav, AudioBuffer};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    r#type: Option<String>,
    code: Option<String>,
}

/// Any server speaking the OpenAI `audio/transcriptions` protocol: the hosted
/// API, or a local faster-whisper / whisper.cpp server serving a fine-tuned model.
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: Option<String>, endpoint: Option<String>, model: String) -> Result<Self> {
        if api_key.is_none() && endpoint.is_none() {
            bail!("api_key is required for the hosted OpenAI API (set api_endpoint for a local server)");
        }

        let client = reqwest::Client::new();
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        info!(
            "Initialized OpenAI-compatible provider with endpoint: {} (model {})",
            endpoint, model
        );

        Ok(Self {
            client,
            api_key,
            endpoint,
            model,
        })
    }

    fn build_form(&self, audio: &AudioBuffer, language: &str) -> Result<Form> {
        let wav = encode_wav(audio)?;
        let file = Part::bytes(wav)
            .file_name("sample.wav")
            .mime_str("audio/wav")
            .context("Invalid MIME type for audio part")?;

        Ok(Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("language", language.to_string())
            .text("response_format", "json"))
    }
}

impl TranscriptionProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "OpenAI-compatible API"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn transcribe<'a>(
        &'a self,
        audio: &'a AudioBuffer,
        language: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            debug!(
                "Sending {:.2}s of audio to {}",
                audio.duration_secs(),
                self.endpoint
            );

            let form = self.build_form(audio, language)?;
            let mut request = self.client.post(&self.endpoint).multipart(form);
            if let Some(api_key) = &self.api_key {
                request = request.bearer_auth(api_key);
            }

            let response = request
                .send()
                .await
                .context("Failed to send request to transcription endpoint")?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .context("Failed to read response body")?;

            if !status.is_success() {
                error!(
                    "Transcription request failed with status {}: {}",
                    status, response_text
                );

                if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
                    bail!(
                        "Transcription API error: {} (type: {:?}, code: {:?})",
                        error_response.error.message,
                        error_response.error.r#type,
                        error_response.error.code
                    );
                }

                bail!(
                    "Transcription request failed with status {}: {}",
                    status,
                    response_text
                );
            }

            let transcription: TranscriptionResponse = serde_json::from_str(&response_text)
                .context("Failed to parse transcription response")?;

            let text = transcription.text.trim().to_string();
            debug!("Raw transcription: {}", text);

            Ok(text)
        })
    }
}
