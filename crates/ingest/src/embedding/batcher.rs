use std::sync::Arc;

use super::traits::{Embedder, EmbeddingError};

/// Chunks are embedded this many at a time.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Collects (ordinal, text) pairs and flushes when the batch is full.
pub struct EmbeddingBatcher {
    buffer: Vec<(usize, String)>,
    batch_size: usize,
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingBatcher {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            embedder,
        }
    }

    /// Add a text to the batch. Returns embeddings if the batch is full (auto-flush).
    pub async fn add(
        &mut self,
        ordinal: usize,
        text: String,
    ) -> Result<Option<Vec<(usize, Vec<f32>)>>, EmbeddingError> {
        self.buffer.push((ordinal, text));
        if self.buffer.len() >= self.batch_size {
            Ok(Some(self.flush().await?))
        } else {
            Ok(None)
        }
    }

    /// Force-flush remaining items.
    pub async fn flush(&mut self) -> Result<Vec<(usize, Vec<f32>)>, EmbeddingError> {
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<(usize, String)> = self.buffer.drain(..).collect();
        let texts: Vec<&str> = batch.iter().map(|(_, t)| t.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: embeddings.len(),
            });
        }

        Ok(batch
            .into_iter()
            .zip(embeddings)
            .map(|((ordinal, _), emb)| (ordinal, emb))
            .collect())
    }

    /// Number of items currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Embed every text in order, `batch_size` at a time. Fails on the first
/// failing batch.
pub async fn embed_all(
    embedder: Arc<dyn Embedder>,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut batcher = EmbeddingBatcher::new(embedder, batch_size);
    let mut out: Vec<(usize, Vec<f32>)> = Vec::with_capacity(texts.len());
    for (i, text) in texts.iter().enumerate() {
        if let Some(done) = batcher.add(i, text.clone()).await? {
            out.extend(done);
        }
    }
    out.extend(batcher.flush().await?);
    out.sort_by_key(|(i, _)| *i);
    Ok(out.into_iter().map(|(_, emb)| emb).collect())
}
