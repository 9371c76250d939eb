//! Retrieval index variants and the capability-driven build.

use std::sync::Arc;

use docqa_core::{Document, IndexMode};
use docqa_ingest::Embedder;

use crate::keyword::{KeywordIndex, ScoredChunk};
use crate::vector::VectorIndex;

/// The index backing a loaded document. Chosen once at upload time.
#[derive(Debug)]
pub enum RetrievalIndex {
    /// Embedding search, with chunk-level keyword search kept for query-time
    /// embedding failures.
    Vector {
        index: VectorIndex,
        fallback: KeywordIndex,
    },
    Keyword(KeywordIndex),
}

impl RetrievalIndex {
    pub fn mode(&self) -> IndexMode {
        match self {
            RetrievalIndex::Vector { .. } => IndexMode::Vector,
            RetrievalIndex::Keyword(_) => IndexMode::Keyword,
        }
    }

    /// Top `k` results for `query`. Never fails: a vector search error drops
    /// to keyword scoring over the same chunks.
    pub async fn search(&self, query: &str, k: usize) -> Vec<ScoredChunk> {
        match self {
            RetrievalIndex::Vector { index, fallback } => match index.search(query, k).await {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!("Vector search failed ({}), using keyword scoring", e);
                    fallback.search(query, k)
                }
            },
            RetrievalIndex::Keyword(index) => index.search(query, k),
        }
    }
}

/// Build the index for a freshly chunked document.
///
/// With an embedder the vector variant is attempted; if embedding fails the
/// document is indexed by sentence keywords instead.
pub async fn build_index(document: &Document, embedder: Option<Arc<dyn Embedder>>) -> RetrievalIndex {
    let Some(embedder) = embedder else {
        tracing::info!("No embedding service configured, indexing '{}' for keyword search", document.title);
        return RetrievalIndex::Keyword(KeywordIndex::over_sentences(document));
    };

    match VectorIndex::build(document.chunks.clone(), embedder).await {
        Ok(index) => RetrievalIndex::Vector {
            index,
            fallback: KeywordIndex::over_chunks(document.chunks.clone()),
        },
        Err(e) => {
            tracing::warn!("{}; falling back to keyword search for '{}'", e, document.title);
            RetrievalIndex::Keyword(KeywordIndex::over_sentences(document))
        }
    }
}
