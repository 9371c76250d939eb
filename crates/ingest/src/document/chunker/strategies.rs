//! Window splitting over extracted documents.

use super::helpers::{find_break, slice};
use super::types::ChunkConfig;
use crate::document::ExtractedDocument;

/// Chunk the full text of an extracted document.
pub fn chunk_document(doc: &ExtractedDocument, config: &ChunkConfig) -> Vec<String> {
    chunk_text(&doc.full_text(), config)
}

/// Split `text` into overlapping windows.
///
/// The text is trimmed first. Text no longer than the window yields a single
/// chunk; empty text yields none. Windows are exact slices of the trimmed
/// text, so adjacent chunks share exactly `overlap_chars` characters. Windows
/// that fall inside a long whitespace run are kept as-is.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let (max, overlap) = config.normalized();
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let hard_end = (start + max).min(chars.len());
        if hard_end == chars.len() {
            chunks.push(slice(&chars, start, hard_end));
            break;
        }

        // The break must land past the overlap so the next window advances.
        let end = find_break(&chars, start + overlap + 1, hard_end);
        chunks.push(slice(&chars, start, end));
        start = end - overlap;
    }

    tracing::debug!("Chunked {} chars into {} chunks", chars.len(), chunks.len());
    chunks
}
