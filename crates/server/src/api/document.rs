//! Upload, query, status and clear for the user's document.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use docqa_core::{DocQaError, Document, IndexMode};
use docqa_ingest::document::{sanitize_filename, title_from_filename};
use docqa_ingest::{chunk_text, extract, FileKind};
use docqa_rag::composer::EXTRACTIVE_CONFIDENCE;
use docqa_rag::{build_index, AnswerComposer, AnswerPolicy, FallbackConfidence};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::{json_or, QuestionRequest};
use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;

// ── Upload ────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub title: String,
    pub chunk_count: usize,
    pub text_length: usize,
    pub message: String,
    /// `vector` or `simple`.
    pub mode: String,
}

/// Upload a PDF, DOCX or TXT file and make it the current document.
///
/// Accepts multipart/form-data with a `file` field. The previous document, if
/// any, is replaced only when the new one is processed successfully.
#[utoipa::path(
    post,
    path = "/api/document/upload",
    tag = "Document",
    request_body(content_type = "multipart/form-data", description = "Field `file`: PDF, DOCX or TXT"),
    responses(
        (status = 200, description = "Document processed", body = UploadResponse),
        (status = 400, description = "Missing file, bad type, or no text", body = ErrorResponse),
        (status = 500, description = "Extraction failed", body = ErrorResponse)
    )
)]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;
        upload = Some((filename, bytes));
        break;
    }

    let (raw_name, bytes) = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    if raw_name.trim().is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }

    let kind = FileKind::from_filename(&raw_name)
        .ok_or_else(|| DocQaError::UnsupportedFormat(raw_name.clone()))?;
    let filename = sanitize_filename(&raw_name);
    let title = match title_from_filename(&filename) {
        t if t.is_empty() => "document".to_string(),
        t => t,
    };
    info!("Upload received: {} ({}, {} bytes)", filename, kind, bytes.len());

    let name = filename.clone();
    let extracted = tokio::task::spawn_blocking(move || extract(&bytes, &name, kind))
        .await
        .map_err(|e| DocQaError::ExtractionError(e.to_string()))?
        .map_err(|e| DocQaError::ExtractionError(e.to_string()))?;

    if extracted.is_blank() {
        return Err(DocQaError::EmptyDocument.into());
    }

    let text = extracted.full_text();
    let pieces = chunk_text(&text, &state.chunking);
    let document = Document::new(title.clone(), text, pieces);
    let chunk_count = document.chunks.len();
    let text_length = document.text_length();

    let index = build_index(&document, state.embedder.clone()).await;
    let mode = index.mode();
    state.session.set(document, index).await;

    Ok(Json(UploadResponse {
        success: true,
        message: format!("Document \"{title}\" processed successfully"),
        title,
        chunk_count,
        text_length,
        mode: mode.as_str().to_string(),
    }))
}

// ── Query ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResponse {
    pub success: bool,
    pub answer: String,
    pub document_title: String,
    /// `vector_search` or `simple_search`.
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_used: Option<usize>,
    pub source: String,
    pub confidence: f32,
}

/// Answer a question from the current document.
#[utoipa::path(
    post,
    path = "/api/document/query",
    tag = "Document",
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Answer", body = QueryResponse),
        (status = 400, description = "No document loaded or empty question", body = ErrorResponse)
    )
)]
pub async fn query(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let loaded = state
        .session
        .snapshot()
        .await
        .ok_or(DocQaError::NoDocumentLoaded)?;

    let req = json_or(body, "No question provided")?;
    let question = req
        .question
        .ok_or_else(|| ApiError::bad_request("No question provided"))?;
    let question = question.trim();
    if question.is_empty() {
        return Err(DocQaError::EmptyQuestion.into());
    }

    let mode = loaded.index.mode();
    let retrieved = loaded.index.search(question, state.config.chunking.top_k).await;
    info!("Query {:?}: {} result(s) via {}", question, retrieved.len(), mode.search_label());

    let title = &loaded.document.title;
    let policy = AnswerPolicy::for_document(title, state.config.llm.temperature, state.config.llm.max_tokens);
    let fallback = match mode {
        IndexMode::Keyword => FallbackConfidence::TermCoverage,
        IndexMode::Vector => FallbackConfidence::Fixed(EXTRACTIVE_CONFIDENCE),
    };
    let result = AnswerComposer::new(state.chat.clone(), policy)
        .compose(question, &retrieved, fallback)
        .await;

    Ok(Json(QueryResponse {
        success: true,
        answer: result.answer,
        document_title: title.clone(),
        mode: mode.search_label().to_string(),
        sources_used: (mode == IndexMode::Vector).then_some(retrieved.len()),
        source: result.source_label,
        confidence: result.confidence,
    }))
}

// ── Status / clear ───────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub has_document: bool,
    pub document_title: Option<String>,
    pub ready_for_queries: bool,
    pub ai_services_available: bool,
    pub mode: String,
    /// RFC 3339 time the current document was loaded.
    pub loaded_at: Option<String>,
}

/// Report whether a document is loaded and which index backs it.
#[utoipa::path(
    get,
    path = "/api/document/status",
    tag = "Document",
    responses((status = 200, description = "Session status", body = StatusResponse))
)]
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let status = state.session.status().await;
    Json(StatusResponse {
        has_document: status.has_document,
        document_title: status.document_title,
        ready_for_queries: status.has_document,
        ai_services_available: state.ai_services_available(),
        mode: status
            .active_mode
            .unwrap_or_else(|| state.capability_mode())
            .as_str()
            .to_string(),
        loaded_at: status.loaded_at.map(|t| t.to_rfc3339()),
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// Forget the current document.
#[utoipa::path(
    post,
    path = "/api/document/clear",
    tag = "Document",
    responses((status = 200, description = "Cleared", body = ClearResponse))
)]
pub async fn clear(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    state.session.clear().await;
    Json(ClearResponse {
        success: true,
        message: "Document cleared successfully".to_string(),
    })
}

// ── Health ───────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentServices {
    pub embeddings: bool,
    pub llm: bool,
    pub document_loaded: bool,
    pub simple_mode: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentHealthResponse {
    pub status: String,
    pub services: DocumentServices,
}

/// Which document services are configured.
#[utoipa::path(
    get,
    path = "/api/document/health",
    tag = "Document",
    responses((status = 200, description = "Capability probe", body = DocumentHealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<DocumentHealthResponse> {
    let status = state.session.status().await;
    Json(DocumentHealthResponse {
        status: "healthy".to_string(),
        services: DocumentServices {
            embeddings: state.embedder.is_some(),
            llm: state.chat.is_some(),
            document_loaded: status.has_document,
            simple_mode: state.capability_mode() == IndexMode::Keyword,
        },
    })
}
