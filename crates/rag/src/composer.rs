//! Turns retrieved text into an answer, with or without a language model.

use std::sync::Arc;

use docqa_core::{AnswerResult, DocQaError};
use docqa_llm::{LlmProvider, Message};

use crate::keyword::{term_coverage, ScoredChunk};

/// Confidence reported for a generated answer.
pub const GENERATED_CONFIDENCE: f32 = 0.8;
/// Confidence reported when retrieved text is returned verbatim.
pub const EXTRACTIVE_CONFIDENCE: f32 = 0.6;

/// Substrings that mark a model answer as a non-answer.
pub const NOT_FOUND_PHRASES: &[&str] = &[
    "not mentioned",
    "not provided",
    "not specified",
    "not found",
    "does not contain",
    "no information",
    "not available",
];

pub const DOCUMENT_REFUSAL: &str =
    "That information is not part of this document. Please ask a question based on the uploaded manual.";

/// How the no-model answer is scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackConfidence {
    Fixed(f32),
    /// Scale `EXTRACTIVE_CONFIDENCE` by the share of query terms present in
    /// the retrieved text.
    TermCoverage,
}

/// Wording and generation settings for one answering context.
#[derive(Debug, Clone)]
pub struct AnswerPolicy {
    pub refusal: String,
    pub refusal_source: String,
    pub source_label: String,
    pub preamble: String,
    /// Separator between retrieved texts in the extractive answer.
    pub joiner: &'static str,
    /// Cap on the extractive context, in characters; an ellipsis is appended.
    pub context_char_limit: Option<usize>,
    pub instructions: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl AnswerPolicy {
    /// Policy for a user-uploaded document.
    pub fn for_document(title: &str, temperature: f32, max_tokens: u32) -> Self {
        Self {
            refusal: DOCUMENT_REFUSAL.to_string(),
            refusal_source: title.to_string(),
            source_label: title.to_string(),
            preamble: format!("Based on the document '{title}', here are the relevant sections:\n\n"),
            joiner: "\n\n",
            context_char_limit: None,
            instructions: format!(
                "You answer questions using ONLY the document \"{title}\".\n\n\
                 Rules:\n\
                 1. Use only information explicitly present in the document excerpts below.\n\
                 2. If the answer is not in the excerpts, reply exactly: \"{DOCUMENT_REFUSAL}\"\n\
                 3. Do not add outside knowledge or assumptions.\n\
                 4. Cite the relevant section when you can.\n\
                 5. Be clear and concise."
            ),
            temperature,
            max_tokens,
        }
    }

    /// Policy for the preloaded operating handbook.
    pub fn for_manual(title: &str) -> Self {
        Self {
            refusal: format!(
                "I couldn't find information about that topic in the {title}. Please try rephrasing \
                 your question or ask about aircraft systems, procedures, or specifications covered \
                 in this manual."
            ),
            refusal_source: "document_search".to_string(),
            source_label: title.to_string(),
            preamble: format!("Based on the {title}:\n\n"),
            joiner: "\n\n",
            context_char_limit: Some(800),
            instructions: format!(
                "You are an assistant for the {title} (Pilot's Operating Handbook).\n\n\
                 Rules:\n\
                 1. Answer only from the handbook content below.\n\
                 2. If the handbook does not cover it, say so plainly.\n\
                 3. Reference specific procedures or specifications.\n\
                 4. Use correct aviation terminology.\n\
                 5. Be concise but complete."
            ),
            temperature: 0.3,
            max_tokens: 500,
        }
    }

    fn refusal_answer(&self) -> AnswerResult {
        AnswerResult::new(self.refusal.clone(), self.refusal_source.clone(), 0.0)
    }
}

/// Answers a question from retrieved text under an [`AnswerPolicy`].
pub struct AnswerComposer {
    llm: Option<Arc<dyn LlmProvider>>,
    policy: AnswerPolicy,
}

impl AnswerComposer {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, policy: AnswerPolicy) -> Self {
        Self { llm, policy }
    }

    pub fn policy(&self) -> &AnswerPolicy {
        &self.policy
    }

    /// Compose an answer. Generation failures never escape; they fall through
    /// to the extractive answer.
    pub async fn compose(
        &self,
        question: &str,
        retrieved: &[ScoredChunk],
        fallback: FallbackConfidence,
    ) -> AnswerResult {
        if retrieved.is_empty() {
            return self.policy.refusal_answer();
        }

        let context = retrieved
            .iter()
            .map(|r| r.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(self.policy.joiner);

        if let Some(llm) = &self.llm {
            match self.generate(llm.as_ref(), question, &context).await {
                Ok(answer) if is_not_found(&answer) || answer.contains(self.policy.refusal.as_str()) => {
                    tracing::info!("Model reported the answer is not in the document");
                    return self.policy.refusal_answer();
                }
                Ok(answer) => {
                    return AnswerResult::new(answer, self.policy.source_label.clone(), GENERATED_CONFIDENCE);
                }
                Err(e) => tracing::warn!("{}; returning retrieved text", e),
            }
        }

        let confidence = match fallback {
            FallbackConfidence::Fixed(c) => c,
            FallbackConfidence::TermCoverage => EXTRACTIVE_CONFIDENCE * term_coverage(question, retrieved),
        };
        AnswerResult::new(self.extractive_answer(&context), self.policy.source_label.clone(), confidence)
    }

    async fn generate(&self, llm: &dyn LlmProvider, question: &str, context: &str) -> Result<String, DocQaError> {
        let messages = vec![
            Message::system(format!("{}\n\nContent:\n{}", self.policy.instructions, context)),
            Message::user(question),
        ];
        let answer = llm
            .complete(messages, self.policy.temperature, self.policy.max_tokens)
            .await
            .map_err(|e| DocQaError::GenerationServiceError(e.to_string()))?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(DocQaError::GenerationServiceError("empty completion".into()));
        }
        Ok(answer.to_string())
    }

    fn extractive_answer(&self, context: &str) -> String {
        match self.policy.context_char_limit {
            Some(limit) => {
                let clipped: String = context.chars().take(limit).collect();
                format!("{}{}...", self.policy.preamble, clipped)
            }
            None => format!("{}{}", self.policy.preamble, context),
        }
    }
}

/// Case-insensitive check for any of [`NOT_FOUND_PHRASES`].
pub fn is_not_found(answer: &str) -> bool {
    let lower = answer.to_lowercase();
    NOT_FOUND_PHRASES.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use docqa_core::Chunk;
    use docqa_llm::LlmError;

    use super::*;

    /// Replies with a fixed script and records what it was asked.
    pub(crate) struct ScriptedLlm {
        reply: Result<String, u16>,
        pub calls: AtomicUsize,
        pub last_messages: Mutex<Vec<Message>>,
    }

    impl ScriptedLlm {
        pub(crate) fn answering(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn complete(&self, messages: Vec<Message>, _temperature: f32, _max_tokens: u32) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages;
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::ApiError {
                    status: *status,
                    body: "upstream error".into(),
                }),
            }
        }
    }

    fn hits(texts: &[&str]) -> Vec<ScoredChunk> {
        texts
            .iter()
            .enumerate()
            .map(|(ordinal, t)| ScoredChunk {
                chunk: Chunk {
                    text: t.to_string(),
                    ordinal,
                    source_title: "manual".into(),
                },
                score: 1.0,
            })
            .collect()
    }

    fn doc_composer(llm: Option<Arc<dyn LlmProvider>>) -> AnswerComposer {
        AnswerComposer::new(llm, AnswerPolicy::for_document("manual", 0.0, 512))
    }

    #[tokio::test]
    async fn empty_retrieval_is_refusal() {
        let llm = Arc::new(ScriptedLlm::answering("anything"));
        let result = doc_composer(Some(llm.clone()))
            .compose("xyz123", &[], FallbackConfidence::Fixed(EXTRACTIVE_CONFIDENCE))
            .await;
        assert_eq!(result.answer, DOCUMENT_REFUSAL);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generated_answer_has_fixed_confidence() {
        let llm = Arc::new(ScriptedLlm::answering("  The max weight is 3400 lbs.  "));
        let result = doc_composer(Some(llm.clone()))
            .compose("max weight?", &hits(&["Max weight 3400 lbs"]), FallbackConfidence::Fixed(EXTRACTIVE_CONFIDENCE))
            .await;
        assert_eq!(result.answer, "The max weight is 3400 lbs.");
        assert_eq!(result.confidence, GENERATED_CONFIDENCE);
        assert_eq!(result.source_label, "manual");

        let messages = llm.last_messages.lock().unwrap().clone();
        assert!(messages[0].content.contains("Max weight 3400 lbs"));
        assert_eq!(messages[1].content, "max weight?");
    }

    #[tokio::test]
    async fn not_found_phrase_becomes_refusal() {
        let llm = Arc::new(ScriptedLlm::answering("The cruise speed is NOT MENTIONED here."));
        let result = doc_composer(Some(llm))
            .compose("cruise?", &hits(&["Fuel"]), FallbackConfidence::Fixed(EXTRACTIVE_CONFIDENCE))
            .await;
        assert_eq!(result.answer, DOCUMENT_REFUSAL);
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn generation_failure_returns_retrieved_text() {
        let llm = Arc::new(ScriptedLlm::failing(500));
        let result = doc_composer(Some(llm))
            .compose("fuel", &hits(&["Fuel A", "Fuel B"]), FallbackConfidence::Fixed(EXTRACTIVE_CONFIDENCE))
            .await;
        assert_eq!(
            result.answer,
            "Based on the document 'manual', here are the relevant sections:\n\nFuel A\n\nFuel B"
        );
        assert_eq!(result.confidence, EXTRACTIVE_CONFIDENCE);
    }

    #[tokio::test]
    async fn coverage_confidence_without_model() {
        let result = doc_composer(None)
            .compose("fuel capacity oil", &hits(&["fuel capacity 84"]), FallbackConfidence::TermCoverage)
            .await;
        assert!((result.confidence - 0.4).abs() < 1e-6);
    }

    #[tokio::test]
    async fn manual_fallback_is_clipped() {
        let composer = AnswerComposer::new(None, AnswerPolicy::for_manual("Test POH"));
        let long = "x".repeat(1000);
        let result = composer
            .compose("xxx", &hits(&[long.as_str()]), FallbackConfidence::Fixed(EXTRACTIVE_CONFIDENCE))
            .await;
        assert!(result.answer.starts_with("Based on the Test POH:\n\n"));
        assert!(result.answer.ends_with("..."));
        assert_eq!(result.answer.len(), "Based on the Test POH:\n\n".len() + 800 + 3);
    }

    #[tokio::test]
    async fn echoed_refusal_has_zero_confidence() {
        let llm = Arc::new(ScriptedLlm::answering(DOCUMENT_REFUSAL));
        let result = doc_composer(Some(llm))
            .compose("cruise?", &hits(&["Fuel"]), FallbackConfidence::Fixed(EXTRACTIVE_CONFIDENCE))
            .await;
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn not_found_detection() {
        assert!(is_not_found("This document does not contain that."));
        assert!(!is_not_found("Fuel capacity is 84 gallons."));
    }
}
