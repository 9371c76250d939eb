use std::sync::Arc;

use docqa_core::{Config, IndexMode};
use docqa_ingest::{ChunkConfig, Embedder};
use docqa_llm::LlmProvider;
use docqa_rag::{DocumentSession, ManualService};
use docqa_voice::VoiceService;

/// Shared state behind every handler.
pub struct AppState {
    pub config: Config,
    pub chunking: ChunkConfig,
    pub session: DocumentSession,
    pub embedder: Option<Arc<dyn Embedder>>,
    pub chat: Option<Arc<dyn LlmProvider>>,
    pub manual: ManualService,
    pub voice: VoiceService,
}

impl AppState {
    /// Both embedding and generation services are configured.
    pub fn ai_services_available(&self) -> bool {
        self.embedder.is_some() && self.chat.is_some()
    }

    /// Mode a new upload would be indexed in.
    pub fn capability_mode(&self) -> IndexMode {
        if self.embedder.is_some() {
            IndexMode::Vector
        } else {
            IndexMode::Keyword
        }
    }
}
