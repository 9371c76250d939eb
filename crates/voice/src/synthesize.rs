//! Text-to-speech with an ordered provider chain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docqa_core::config::{LlmConfig, VoiceConfig};
use serde::Serialize;
use serde_json::json;

use crate::audio::encode_audio;
use crate::error::VoiceError;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

pub const TEXT_ONLY_MESSAGE: &str = "Text-to-speech temporarily unavailable, but text response is ready";

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Provider name reported to clients.
    fn name(&self) -> &'static str;

    /// Render `text` to encoded audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError>;
}

// ── ElevenLabs ───────────────────────────────────────────────

pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    voice_id: String,
    model_id: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(api_key: String, base_url: String, voice_id: String, model_id: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            voice_id,
            model_id,
        }
    }

    pub fn from_config(voice: &VoiceConfig) -> Option<Self> {
        let key = voice.usable_elevenlabs_key()?;
        Some(Self::new(
            key.to_string(),
            voice.elevenlabs_base_url.clone(),
            voice.elevenlabs_voice_id.clone(),
            voice.elevenlabs_model.clone(),
            Duration::from_secs(voice.synthesis_timeout_secs),
        ))
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        let body = json!({
            "text": text,
            "model_id": self.model_id,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.5,
            },
        });

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Api {
                provider: self.name(),
                status,
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

// ── OpenAI TTS ───────────────────────────────────────────────

pub struct OpenAiSynthesizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    voice: String,
}

impl OpenAiSynthesizer {
    pub fn new(api_key: String, base_url: String, model: String, voice: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            voice,
        }
    }

    pub fn from_config(llm: &LlmConfig, voice: &VoiceConfig) -> Option<Self> {
        let key = llm.usable_key()?;
        Some(Self::new(
            key.to_string(),
            llm.openai_base_url.clone().unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            voice.tts_model.clone(),
            voice.tts_voice.clone(),
            Duration::from_secs(llm.timeout_secs),
        ))
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSynthesizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        let url = format!("{}/v1/audio/speech", self.base_url);
        let body = json!({
            "model": self.model,
            "voice": self.voice,
            "input": text,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Api {
                provider: self.name(),
                status,
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

// ── Chain ────────────────────────────────────────────────────

/// Result of a synthesis request. `audio` is base64 and absent when every
/// provider failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisOutcome {
    pub audio: Option<String>,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SynthesisOutcome {
    fn text_only() -> Self {
        Self {
            audio: None,
            provider: "fallback".to_string(),
            message: Some(TEXT_ONLY_MESSAGE.to_string()),
        }
    }
}

/// Tries each provider in order; the first one that returns audio wins.
#[derive(Clone, Default)]
pub struct SynthesisChain {
    providers: Vec<Arc<dyn SpeechSynthesizer>>,
}

impl SynthesisChain {
    pub fn new(providers: Vec<Arc<dyn SpeechSynthesizer>>) -> Self {
        Self { providers }
    }

    /// ElevenLabs first, then OpenAI; providers without credentials are left out.
    pub fn from_config(llm: &LlmConfig, voice: &VoiceConfig) -> Self {
        let mut providers: Vec<Arc<dyn SpeechSynthesizer>> = Vec::new();
        if let Some(p) = ElevenLabsSynthesizer::from_config(voice) {
            providers.push(Arc::new(p));
        }
        if let Some(p) = OpenAiSynthesizer::from_config(llm, voice) {
            providers.push(Arc::new(p));
        }
        Self::new(providers)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Name of the provider tried first, or `"fallback"`.
    pub fn primary(&self) -> &'static str {
        self.providers.first().map(|p| p.name()).unwrap_or("fallback")
    }

    pub async fn synthesize(&self, text: &str) -> SynthesisOutcome {
        for provider in &self.providers {
            match provider.synthesize(text).await {
                Ok(audio) if !audio.is_empty() => {
                    tracing::info!("Synthesized {} bytes of audio via {}", audio.len(), provider.name());
                    return SynthesisOutcome {
                        audio: Some(encode_audio(&audio)),
                        provider: provider.name().to_string(),
                        message: None,
                    };
                }
                Ok(_) => tracing::warn!("{}", VoiceError::EmptyAudio(provider.name())),
                Err(e) => tracing::warn!("{} synthesis failed: {}", provider.name(), e),
            }
        }
        tracing::warn!("All speech providers failed, returning text only");
        SynthesisOutcome::text_only()
    }
}
