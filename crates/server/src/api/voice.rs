//! Speech-to-text and text-to-speech endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::json_or;
use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TranscribeRequest {
    /// Base64 audio, optionally as a `data:` URL.
    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscribeResponse {
    pub success: bool,
    pub transcription: String,
}

#[utoipa::path(
    post,
    path = "/api/voice/transcribe",
    tag = "Voice",
    request_body = TranscribeRequest,
    responses(
        (status = 200, description = "Transcribed text", body = TranscribeResponse),
        (status = 400, description = "Missing or undecodable audio", body = ErrorResponse),
        (status = 500, description = "Transcription service unavailable or failed", body = ErrorResponse)
    )
)]
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let req = json_or(body, "No audio data provided")?;
    let audio = req
        .audio
        .ok_or_else(|| ApiError::bad_request("No audio data provided"))?;
    if audio.trim().is_empty() {
        return Err(ApiError::bad_request("Empty audio data"));
    }

    let transcription = state.voice.transcribe_base64(&audio).await?;
    Ok(Json(TranscribeResponse {
        success: true,
        transcription,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SynthesizeResponse {
    pub success: bool,
    /// Base64 audio; null when only text is available.
    pub audio: Option<String>,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/voice/synthesize",
    tag = "Voice",
    request_body = SynthesizeRequest,
    responses(
        (status = 200, description = "Audio, or a text-only notice", body = SynthesizeResponse),
        (status = 400, description = "Missing or empty text", body = ErrorResponse)
    )
)]
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SynthesizeRequest>, JsonRejection>,
) -> Result<Json<SynthesizeResponse>, ApiError> {
    let req = json_or(body, "No text provided")?;
    let text = req.text.ok_or_else(|| ApiError::bad_request("No text provided"))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Text cannot be empty"));
    }

    let outcome = state.voice.synthesize(text).await;
    Ok(Json(SynthesizeResponse {
        success: true,
        audio: outcome.audio,
        provider: outcome.provider,
        message: outcome.message,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoiceServices {
    pub whisper: bool,
    pub openai_tts: bool,
    pub elevenlabs: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoiceTestResponse {
    pub status: String,
    pub services: VoiceServices,
    pub primary_tts: String,
    pub fallback_available: bool,
}

/// Which voice services are configured. Makes no outbound calls.
#[utoipa::path(
    get,
    path = "/api/voice/test",
    tag = "Voice",
    responses((status = 200, description = "Capability probe", body = VoiceTestResponse))
)]
pub async fn test(State(state): State<Arc<AppState>>) -> Json<VoiceTestResponse> {
    let caps = state.voice.capabilities();
    Json(VoiceTestResponse {
        status: "healthy".to_string(),
        services: VoiceServices {
            whisper: caps.whisper,
            openai_tts: caps.openai_tts,
            elevenlabs: caps.elevenlabs,
        },
        primary_tts: caps.primary_tts.clone(),
        fallback_available: true,
    })
}
