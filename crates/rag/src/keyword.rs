//! Term-frequency retrieval used when no embedding service is available.

use docqa_core::{Chunk, Document};

/// A retrieved unit and its relevance score (higher is better).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Query words that take part in scoring: lowercased, stripped of surrounding
/// punctuation, longer than two characters. Duplicates are kept.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.chars().count() > 2)
        .collect()
}

/// Sum over `terms` of each term's occurrence count in `text_lower`.
pub fn keyword_score(terms: &[String], text_lower: &str) -> usize {
    terms
        .iter()
        .map(|t| text_lower.matches(t.as_str()).count())
        .sum()
}

/// What a [`KeywordIndex`] scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordUnit {
    /// Document chunks as produced by the chunker.
    Chunk,
    /// Raw sentences of the document text, split on `.`.
    Sentence,
}

/// Scores units by raw term overlap. Holds only lowercased copies of the text.
#[derive(Debug, Clone)]
pub struct KeywordIndex {
    unit: KeywordUnit,
    units: Vec<Chunk>,
    lowered: Vec<String>,
}

impl KeywordIndex {
    pub fn over_chunks(chunks: Vec<Chunk>) -> Self {
        Self::new(KeywordUnit::Chunk, chunks)
    }

    /// Index the document's sentences instead of its chunks.
    pub fn over_sentences(document: &Document) -> Self {
        let units = document
            .raw_text
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(ordinal, s)| Chunk {
                text: s.to_string(),
                ordinal,
                source_title: document.title.clone(),
            })
            .collect();
        Self::new(KeywordUnit::Sentence, units)
    }

    fn new(unit: KeywordUnit, units: Vec<Chunk>) -> Self {
        let lowered = units.iter().map(|c| c.text.to_lowercase()).collect();
        Self {
            unit,
            units,
            lowered,
        }
    }

    pub fn unit(&self) -> KeywordUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Top `k` units with a non-zero score, best first. Ties keep ordinal order.
    pub fn search(&self, query: &str, k: usize) -> Vec<ScoredChunk> {
        let terms = query_terms(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize)> = self
            .lowered
            .iter()
            .enumerate()
            .map(|(i, text)| (i, keyword_score(&terms, text)))
            .filter(|(_, score)| *score > 0)
            .collect();

        // Stable: equal scores stay in ordinal order.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: self.units[i].clone(),
                score: score as f32,
            })
            .collect()
    }
}

/// Fraction of distinct query terms found in any of `retrieved`.
pub fn term_coverage(query: &str, retrieved: &[ScoredChunk]) -> f32 {
    let mut terms = query_terms(query);
    terms.sort();
    terms.dedup();
    if terms.is_empty() {
        return 0.0;
    }
    let lowered: Vec<String> = retrieved.iter().map(|r| r.chunk.text.to_lowercase()).collect();
    let matched = terms
        .iter()
        .filter(|t| lowered.iter().any(|text| text.contains(t.as_str())))
        .count();
    matched as f32 / terms.len() as f32
}
