//! Embedding-backed retrieval.

use std::sync::Arc;

use docqa_core::{Chunk, DocQaError};
use docqa_ingest::embedding::{embed_all, DEFAULT_BATCH_SIZE};
use docqa_ingest::{Embedder, EmbeddingError};

use crate::keyword::ScoredChunk;

/// One embedding per chunk plus the embedder used for queries.
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("chunks", &self.chunks.len())
            .field("dimensions", &self.embedder.dimensions())
            .finish()
    }
}

impl VectorIndex {
    /// Embed every chunk. Any embedding failure is an `IndexBuildError`.
    pub async fn build(chunks: Vec<Chunk>, embedder: Arc<dyn Embedder>) -> Result<Self, DocQaError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embed_all(embedder.clone(), &texts, DEFAULT_BATCH_SIZE)
            .await
            .map_err(|e| DocQaError::IndexBuildError(e.to_string()))?;

        if embeddings.len() != chunks.len() {
            return Err(DocQaError::IndexBuildError(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        tracing::info!("Vector index built: {} chunks embedded", chunks.len());
        Ok(Self {
            chunks,
            embeddings,
            embedder,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Top `k` chunks by cosine similarity to the query, best first.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, EmbeddingError> {
        let query_vec = self.embedder.embed_query(query).await?;

        let mut results: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .zip(&self.embeddings)
            .map(|(chunk, emb)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(&query_vec, emb),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        Ok(results)
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
