//! The single "current document" slot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use docqa_core::{Document, IndexMode};
use tokio::sync::RwLock;

use crate::index::RetrievalIndex;

/// A document together with the index built for it. The pair is stored and
/// replaced as one value, so an index never outlives or precedes its document.
#[derive(Debug)]
pub struct LoadedDocument {
    pub document: Document,
    pub index: RetrievalIndex,
    pub loaded_at: DateTime<Utc>,
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub has_document: bool,
    pub document_title: Option<String>,
    pub active_mode: Option<IndexMode>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Holds at most one loaded document.
#[derive(Debug, Default)]
pub struct DocumentSession {
    slot: RwLock<Option<Arc<LoadedDocument>>>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was loaded.
    pub async fn set(&self, document: Document, index: RetrievalIndex) {
        let loaded = Arc::new(LoadedDocument {
            document,
            index,
            loaded_at: Utc::now(),
        });
        let previous = self.slot.write().await.replace(loaded.clone());
        tracing::info!(
            "Session document set to '{}' ({} chunks, {} mode){}",
            loaded.document.title,
            loaded.document.chunks.len(),
            loaded.index.mode(),
            previous
                .map(|p| format!(", replacing '{}'", p.document.title))
                .unwrap_or_default()
        );
    }

    /// Drop the loaded document. Returns whether one was loaded.
    pub async fn clear(&self) -> bool {
        let previous = self.slot.write().await.take();
        if let Some(p) = &previous {
            tracing::info!("Session document '{}' cleared", p.document.title);
        }
        previous.is_some()
    }

    /// Shared handle to the loaded document; queries run against this without
    /// holding the lock.
    pub async fn snapshot(&self) -> Option<Arc<LoadedDocument>> {
        self.slot.read().await.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        match self.slot.read().await.as_ref() {
            Some(loaded) => SessionStatus {
                has_document: true,
                document_title: Some(loaded.document.title.clone()),
                active_mode: Some(loaded.index.mode()),
                loaded_at: Some(loaded.loaded_at),
            },
            None => SessionStatus {
                has_document: false,
                document_title: None,
                active_mode: None,
                loaded_at: None,
            },
        }
    }
}
