//! Read-only Q&A over the preloaded handbook.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use docqa_core::DocQaError;
use docqa_rag::manual::ManualInfo;
use serde::Serialize;
use utoipa::ToSchema;

use super::{json_or, QuestionRequest};
use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ManualInfoBody {
    pub title: String,
    pub subtitle: String,
    pub pages: usize,
    pub sections: usize,
}

impl From<ManualInfo> for ManualInfoBody {
    fn from(info: ManualInfo) -> Self {
        Self {
            title: info.title,
            subtitle: info.subtitle,
            pages: info.pages,
            sections: info.sections,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ManualInfoResponse {
    pub success: bool,
    pub document: ManualInfoBody,
}

#[utoipa::path(
    get,
    path = "/api/poh/info",
    tag = "Handbook",
    responses((status = 200, description = "Handbook summary", body = ManualInfoResponse))
)]
pub async fn info(State(state): State<Arc<AppState>>) -> Json<ManualInfoResponse> {
    Json(ManualInfoResponse {
        success: true,
        document: state.manual.info().into(),
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AskResponse {
    pub success: bool,
    pub question: String,
    pub answer: String,
    pub source: String,
    pub confidence: f32,
}

#[utoipa::path(
    post,
    path = "/api/poh/ask",
    tag = "Handbook",
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Answer from the handbook", body = AskResponse),
        (status = 400, description = "Missing or empty question", body = ErrorResponse)
    )
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let req = json_or(body, "Question is required")?;
    let question = req
        .question
        .ok_or_else(|| ApiError::bad_request("Question is required"))?;
    let question = question.trim().to_string();
    if question.is_empty() {
        return Err(DocQaError::EmptyQuestion.into());
    }

    let result = state.manual.ask(&question).await;
    Ok(Json(AskResponse {
        success: true,
        question,
        answer: result.answer,
        source: result.source_label,
        confidence: result.confidence,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SamplesResponse {
    pub success: bool,
    pub questions: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/poh/samples",
    tag = "Handbook",
    responses((status = 200, description = "Example questions", body = SamplesResponse))
)]
pub async fn samples(State(state): State<Arc<AppState>>) -> Json<SamplesResponse> {
    Json(SamplesResponse {
        success: true,
        questions: state.manual.sample_questions().iter().map(|q| q.to_string()).collect(),
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ManualHealthResponse {
    pub success: bool,
    pub status: String,
    pub document_loaded: bool,
}

#[utoipa::path(
    get,
    path = "/api/poh/health",
    tag = "Handbook",
    responses((status = 200, description = "Handbook availability", body = ManualHealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ManualHealthResponse> {
    Json(ManualHealthResponse {
        success: true,
        status: "healthy".to_string(),
        document_loaded: state.manual.is_loaded(),
    })
}
