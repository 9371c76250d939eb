//! Overlapping character-window chunking.
//!
//! Splits extracted text into windows of at most `max_chunk_chars`, preferring
//! to end a window on a paragraph break, then a sentence end, then whitespace.
//! Each window after the first starts `overlap_chars` before the previous end.

mod helpers;
mod strategies;
mod types;

pub use strategies::{chunk_document, chunk_text};
pub use types::ChunkConfig;

#[cfg(test)]
mod tests;
