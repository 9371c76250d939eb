//! OpenAPI documentation aggregator, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "docqa API",
        version = "0.1.0",
        description = "Question answering over an uploaded document or a preloaded handbook, with voice input and output.",
    ),
    tags(
        (name = "Health", description = "Server liveness"),
        (name = "Document", description = "Upload, query, status and clear of the current document"),
        (name = "Handbook", description = "Read-only Q&A over the preloaded operating handbook"),
        (name = "Voice", description = "Speech-to-text and text-to-speech"),
    ),
    paths(
        crate::api::health::health,
        crate::api::document::upload,
        crate::api::document::query,
        crate::api::document::status,
        crate::api::document::clear,
        crate::api::document::health,
        crate::api::manual::info,
        crate::api::manual::ask,
        crate::api::manual::samples,
        crate::api::manual::health,
        crate::api::voice::transcribe,
        crate::api::voice::synthesize,
        crate::api::voice::test,
    )
)]
pub struct ApiDoc;
