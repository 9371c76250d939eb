use thiserror::Error;

/// Failures that can surface from the document QA pipeline.
///
/// Only the extraction and request-validation variants ever reach a client as
/// an error; index, generation and synthesis failures are degraded by the
/// caller into a fallback result.
#[derive(Error, Debug)]
pub enum DocQaError {
    #[error("File type not allowed. Please upload PDF, DOCX, or TXT files.")]
    UnsupportedFormat(String),

    #[error("Error processing document: {0}")]
    ExtractionError(String),

    #[error("No text could be extracted from the document")]
    EmptyDocument,

    #[error("Index build failed: {0}")]
    IndexBuildError(String),

    #[error("No document has been uploaded and processed")]
    NoDocumentLoaded,

    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Generation service error: {0}")]
    GenerationServiceError(String),

    #[error("Transcription failed: {0}")]
    TranscriptionError(String),

    #[error("Speech synthesis failed: {0}")]
    SynthesisError(String),
}

impl DocQaError {
    /// True for errors caused by the request itself rather than a failing service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DocQaError::UnsupportedFormat(_)
                | DocQaError::EmptyDocument
                | DocQaError::NoDocumentLoaded
                | DocQaError::EmptyQuestion
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(DocQaError::EmptyQuestion.is_client_error());
        assert!(DocQaError::UnsupportedFormat("exe".into()).is_client_error());
        assert!(!DocQaError::ExtractionError("bad xref".into()).is_client_error());
        assert!(!DocQaError::TranscriptionError("timeout".into()).is_client_error());
    }

    #[test]
    fn messages_match_api_wording() {
        assert_eq!(
            DocQaError::NoDocumentLoaded.to_string(),
            "No document has been uploaded and processed"
        );
        assert_eq!(
            DocQaError::ExtractionError("broken".into()).to_string(),
            "Error processing document: broken"
        );
    }
}
