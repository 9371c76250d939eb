//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.server.max_upload_bytes();

    let document = Router::new()
        .route(
            "/upload",
            post(api::document::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/query", post(api::document::query))
        .route("/status", get(api::document::status))
        .route("/clear", post(api::document::clear))
        .route("/health", get(api::document::health));

    let manual = Router::new()
        .route("/info", get(api::manual::info))
        .route("/ask", post(api::manual::ask))
        .route("/samples", get(api::manual::samples))
        .route("/health", get(api::manual::health));

    let voice = Router::new()
        .route("/transcribe", post(api::voice::transcribe))
        .route("/synthesize", post(api::voice::synthesize))
        .route("/test", get(api::voice::test));

    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .nest("/document", document)
        .nest("/poh", manual)
        .nest("/voice", voice);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}
