//! Speech-to-text and text-to-speech around the question/answer loop.

pub mod audio;
pub mod error;
pub mod synthesize;
pub mod transcribe;

use std::sync::Arc;

use docqa_core::config::{LlmConfig, VoiceConfig};
use serde::Serialize;

pub use audio::{decode_audio, encode_audio};
pub use error::VoiceError;
pub use synthesize::{SpeechSynthesizer, SynthesisChain, SynthesisOutcome};
pub use transcribe::{OpenAiTranscriber, Transcriber};

/// Which voice backends are configured. No network calls are made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceCapabilities {
    pub whisper: bool,
    pub openai_tts: bool,
    pub elevenlabs: bool,
    pub primary_tts: String,
}

/// Transcriber and synthesis chain built from config.
#[derive(Clone)]
pub struct VoiceService {
    transcriber: Option<Arc<dyn Transcriber>>,
    synthesis: SynthesisChain,
    capabilities: VoiceCapabilities,
}

impl VoiceService {
    pub fn new(
        transcriber: Option<Arc<dyn Transcriber>>,
        synthesis: SynthesisChain,
        capabilities: VoiceCapabilities,
    ) -> Self {
        Self {
            transcriber,
            synthesis,
            capabilities,
        }
    }

    pub fn from_config(llm: &LlmConfig, voice: &VoiceConfig) -> Self {
        let transcriber = OpenAiTranscriber::from_config(llm, voice)
            .map(|t| Arc::new(t) as Arc<dyn Transcriber>);
        let synthesis = SynthesisChain::from_config(llm, voice);
        let capabilities = VoiceCapabilities {
            whisper: transcriber.is_some(),
            openai_tts: llm.is_configured(),
            elevenlabs: voice.elevenlabs_configured(),
            primary_tts: synthesis.primary().to_string(),
        };
        tracing::info!(
            "Voice: transcription={}, tts chain={:?}",
            capabilities.whisper,
            synthesis.provider_names()
        );
        Self::new(transcriber, synthesis, capabilities)
    }

    pub fn capabilities(&self) -> &VoiceCapabilities {
        &self.capabilities
    }

    /// Decode base64 audio and transcribe it.
    pub async fn transcribe_base64(&self, encoded: &str) -> Result<String, VoiceError> {
        let transcriber = self
            .transcriber
            .as_ref()
            .ok_or(VoiceError::NotConfigured("OpenAI transcription"))?;
        let audio = decode_audio(encoded)?;
        transcriber.transcribe(audio).await
    }

    pub async fn synthesize(&self, text: &str) -> SynthesisOutcome {
        self.synthesis.synthesize(text).await
    }
}
