//! Question answering over the preloaded operating handbook.
//!
//! The handbook is read once from two JSON files in the data directory:
//! `poh_content.json` (title, subtitle, pages, sections) and `poh_chunks.json`
//! (an array of `{ "text": ... }` records). Missing files leave the service
//! empty; it still answers, with a "no document" message.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docqa_core::config::ManualConfig;
use docqa_core::{AnswerResult, Chunk};
use docqa_llm::LlmProvider;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composer::{AnswerComposer, AnswerPolicy, FallbackConfidence, EXTRACTIVE_CONFIDENCE};
use crate::keyword::KeywordIndex;

pub const CONTENT_FILE: &str = "poh_content.json";
pub const CHUNKS_FILE: &str = "poh_chunks.json";

pub const NO_DOCUMENT_ANSWER: &str = "No document is currently loaded. Please upload a document first.";

const SAMPLE_QUESTIONS: &[&str] = &[
    "What is the maximum gross weight?",
    "What are the engine specifications?",
    "What is the fuel capacity?",
    "What are the takeoff procedures?",
    "What are the landing procedures?",
    "What are the emergency procedures?",
    "What is the cruise speed?",
    "What are the electrical system specifications?",
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualContent {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub pages: Vec<serde_json::Value>,
    #[serde(default)]
    pub sections: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChunkRecord {
    text: String,
}

/// Summary returned by the info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualInfo {
    pub title: String,
    pub subtitle: String,
    pub pages: usize,
    pub sections: usize,
}

/// Parsed handbook files.
#[derive(Debug, Clone)]
pub struct ManualDataset {
    pub content: ManualContent,
    pub chunks: Vec<Chunk>,
}

impl ManualDataset {
    /// Load the handbook from `dir`. `Ok(None)` when the content file is absent.
    /// A missing chunks file yields a dataset with no searchable chunks.
    pub fn load(dir: &Path) -> Result<Option<Self>, DatasetError> {
        let content_path = dir.join(CONTENT_FILE);
        if !content_path.exists() {
            return Ok(None);
        }
        let content: ManualContent = read_json(&content_path)?;

        let chunks_path = dir.join(CHUNKS_FILE);
        let records: Vec<ChunkRecord> = if chunks_path.exists() {
            read_json(&chunks_path)?
        } else {
            tracing::warn!("{} not found, handbook has no searchable chunks", chunks_path.display());
            Vec::new()
        };

        let chunks = records
            .into_iter()
            .enumerate()
            .map(|(ordinal, r)| Chunk {
                text: r.text,
                ordinal,
                source_title: content.title.clone(),
            })
            .collect();

        Ok(Some(Self { content, chunks }))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

struct LoadedManual {
    content: ManualContent,
    index: KeywordIndex,
}

/// Read-only Q&A over the handbook.
pub struct ManualService {
    manual: Option<LoadedManual>,
    llm: Option<Arc<dyn LlmProvider>>,
    top_k: usize,
}

impl ManualService {
    pub fn new(dataset: Option<ManualDataset>, llm: Option<Arc<dyn LlmProvider>>, top_k: usize) -> Self {
        let manual = dataset.map(|d| LoadedManual {
            index: KeywordIndex::over_chunks(d.chunks),
            content: d.content,
        });
        Self { manual, llm, top_k }
    }

    /// Load from the configured data directory. Load errors are logged and
    /// leave the service empty.
    pub fn from_config(config: &ManualConfig, llm: Option<Arc<dyn LlmProvider>>) -> Self {
        let dataset = match ManualDataset::load(&config.data_dir) {
            Ok(Some(d)) => {
                tracing::info!("Loaded handbook '{}' ({} chunks)", d.content.title, d.chunks.len());
                Some(d)
            }
            Ok(None) => {
                tracing::warn!("No handbook found in {}", config.data_dir.display());
                None
            }
            Err(e) => {
                tracing::warn!("Handbook not loaded: {}", e);
                None
            }
        };
        Self::new(dataset, llm, config.top_k)
    }

    pub fn info(&self) -> ManualInfo {
        match &self.manual {
            Some(m) => ManualInfo {
                title: m.content.title.clone(),
                subtitle: m.content.subtitle.clone(),
                pages: m.content.pages.len(),
                sections: m.content.sections.len(),
            },
            None => ManualInfo {
                title: "No document loaded".to_string(),
                subtitle: String::new(),
                pages: 0,
                sections: 0,
            },
        }
    }

    /// True when the handbook has at least one page.
    pub fn is_loaded(&self) -> bool {
        self.manual.as_ref().is_some_and(|m| !m.content.pages.is_empty())
    }

    pub fn sample_questions(&self) -> &'static [&'static str] {
        SAMPLE_QUESTIONS
    }

    pub async fn ask(&self, question: &str) -> AnswerResult {
        let Some(manual) = &self.manual else {
            return AnswerResult::new(NO_DOCUMENT_ANSWER, "system", 0.0);
        };

        let retrieved = manual.index.search(question, self.top_k);
        tracing::info!("Handbook search for {:?}: {} chunk(s)", question, retrieved.len());

        let composer = AnswerComposer::new(self.llm.clone(), AnswerPolicy::for_manual(&manual.content.title));
        composer
            .compose(question, &retrieved, FallbackConfidence::Fixed(EXTRACTIVE_CONFIDENCE))
            .await
    }
}
