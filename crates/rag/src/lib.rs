//! Retrieval and answering: indexes, answer composition, the document
//! session and the preloaded handbook service.

pub mod composer;
pub mod index;
pub mod keyword;
pub mod manual;
pub mod session;
pub mod vector;

pub use composer::{AnswerComposer, AnswerPolicy, FallbackConfidence};
pub use index::{build_index, RetrievalIndex};
pub use keyword::{KeywordIndex, ScoredChunk};
pub use manual::{ManualDataset, ManualService};
pub use session::{DocumentSession, LoadedDocument, SessionStatus};
pub use vector::VectorIndex;
