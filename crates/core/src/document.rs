use serde::{Deserialize, Serialize};

/// One window of a document's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Position within the owning document, contiguous from 0.
    pub ordinal: usize,
    pub source_title: String,
}

/// An uploaded document after extraction and chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub raw_text: String,
    pub chunks: Vec<Chunk>,
}

impl Document {
    /// Wrap pre-split chunk texts, assigning ordinals in order.
    pub fn new(title: impl Into<String>, raw_text: impl Into<String>, pieces: Vec<String>) -> Self {
        let title = title.into();
        let chunks = pieces
            .into_iter()
            .enumerate()
            .map(|(ordinal, text)| Chunk {
                text,
                ordinal,
                source_title: title.clone(),
            })
            .collect();
        Self {
            title,
            raw_text: raw_text.into(),
            chunks,
        }
    }

    /// Length of the raw text in characters.
    pub fn text_length(&self) -> usize {
        self.raw_text.chars().count()
    }
}

/// Which retrieval strategy backs a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    Vector,
    #[serde(rename = "simple")]
    Keyword,
}

impl IndexMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexMode::Vector => "vector",
            IndexMode::Keyword => "simple",
        }
    }

    /// Label reported alongside query answers.
    pub fn search_label(&self) -> &'static str {
        match self {
            IndexMode::Vector => "vector_search",
            IndexMode::Keyword => "simple_search",
        }
    }
}

impl std::fmt::Display for IndexMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer produced for one question. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub source_label: String,
    /// Always within `[0, 1]`.
    pub confidence: f32,
}

impl AnswerResult {
    pub fn new(answer: impl Into<String>, source_label: impl Into<String>, confidence: f32) -> Self {
        Self {
            answer: answer.into(),
            source_label: source_label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
