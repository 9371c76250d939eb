//! Builds service clients and the shared state from configuration.

use std::sync::Arc;

use docqa_core::Config;
use docqa_ingest::{ChunkConfig, Embedder, OpenAiEmbedder};
use docqa_llm::{create_provider, LlmProvider};
use docqa_rag::{DocumentSession, ManualService};
use docqa_voice::VoiceService;
use tracing::{info, warn};

use crate::state::AppState;

pub fn build_embedder(config: &Config) -> Option<Arc<dyn Embedder>> {
    match OpenAiEmbedder::from_config(&config.llm) {
        Some(embedder) => {
            info!(
                "Embedding provider ready: openai (model: {}, dims: {})",
                config.llm.embedding_model, config.llm.embedding_dimensions
            );
            Some(Arc::new(embedder))
        }
        None => {
            warn!("OPENAI_API_KEY missing or too short, uploads will use keyword search");
            None
        }
    }
}

pub fn build_chat_provider(config: &Config, model: &str) -> Option<Arc<dyn LlmProvider>> {
    match create_provider(&config.llm, model) {
        Ok(provider) => {
            info!("Chat provider ready: openai (model: {})", model);
            Some(Arc::from(provider))
        }
        Err(e) => {
            warn!("Chat provider for {} unavailable: {}", model, e);
            None
        }
    }
}

pub fn build_state(config: Config) -> AppState {
    let embedder = build_embedder(&config);
    let chat = build_chat_provider(&config, &config.llm.chat_model);
    let manual_chat = build_chat_provider(&config, &config.manual.chat_model);
    let manual = ManualService::from_config(&config.manual, manual_chat);
    let voice = VoiceService::from_config(&config.llm, &config.voice);

    AppState {
        chunking: ChunkConfig::from(&config.chunking),
        session: DocumentSession::new(),
        embedder,
        chat,
        manual,
        voice,
        config,
    }
}
