//! Speech-to-text.

use std::time::Duration;

use async_trait::async_trait;
use docqa_core::config::{LlmConfig, VoiceConfig};
use reqwest::multipart;

use crate::error::VoiceError;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe raw audio bytes to text.
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, VoiceError>;
}

/// OpenAI audio transcription (Whisper).
pub struct OpenAiTranscriber {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiTranscriber {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `None` when the OpenAI key fails the capability probe.
    pub fn from_config(llm: &LlmConfig, voice: &VoiceConfig) -> Option<Self> {
        let key = llm.usable_key()?;
        Some(Self::new(
            key.to_string(),
            voice.transcription_model.clone(),
            llm.openai_base_url.clone().unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            Duration::from_secs(llm.timeout_secs),
        ))
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, VoiceError> {
        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        tracing::debug!("Transcribing {} bytes via {}", audio.len(), url);

        let part = multipart::Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "text");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Api {
                provider: "openai",
                status,
                body,
            });
        }

        Ok(response.text().await?.trim().to_string())
    }
}
