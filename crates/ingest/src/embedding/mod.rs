pub mod batcher;
pub mod openai;
pub mod traits;

pub use batcher::{embed_all, EmbeddingBatcher, DEFAULT_BATCH_SIZE};
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};
