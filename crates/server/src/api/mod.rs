//! API endpoint modules, one per route group.

pub mod doc;
pub mod document;
pub mod health;
pub mod manual;
pub mod voice;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;

/// Body of the question endpoints.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// Unwrap a JSON body, reporting a malformed or missing body with `missing_msg`.
pub(crate) fn json_or<T>(body: Result<Json<T>, JsonRejection>, missing_msg: &str) -> Result<T, ApiError> {
    body.map(|Json(v)| v).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::bad_request(missing_msg)
    })
}
