//! Document ingestion: text extraction, chunking and embeddings.

pub mod document;
pub mod embedding;

pub use document::chunker::{chunk_document, chunk_text, ChunkConfig};
pub use document::{extract, extract_text, ExtractedDocument, ExtractionError, FileKind};
pub use embedding::{Embedder, EmbeddingError, OpenAiEmbedder};
