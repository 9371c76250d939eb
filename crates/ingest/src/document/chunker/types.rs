//! Chunk configuration.

use docqa_core::config::ChunkingConfig;

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the chunking engine. Sizes are in characters.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 1000).
    pub max_chunk_chars: usize,
    /// Characters shared by adjacent chunks (default: 200).
    pub overlap_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 1000,
            overlap_chars: 200,
        }
    }
}

impl ChunkConfig {
    pub fn new(max_chunk_chars: usize, overlap_chars: usize) -> Self {
        Self {
            max_chunk_chars,
            overlap_chars,
        }
    }

    /// Effective `(max, overlap)`: max is at least 1 and overlap stays below max
    /// so every window advances.
    pub(crate) fn normalized(&self) -> (usize, usize) {
        let max = self.max_chunk_chars.max(1);
        (max, self.overlap_chars.min(max - 1))
    }
}

impl From<&ChunkingConfig> for ChunkConfig {
    fn from(cfg: &ChunkingConfig) -> Self {
        Self::new(cfg.chunk_size, cfg.chunk_overlap)
    }
}
