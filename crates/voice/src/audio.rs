//! Base64 transport encoding for audio payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::VoiceError;

/// Decode a base64 audio payload. A `data:<mime>;base64,` prefix, as sent by
/// browsers, is accepted and stripped.
pub fn decode_audio(encoded: &str) -> Result<Vec<u8>, VoiceError> {
    let trimmed = encoded.trim();
    let payload = match trimmed.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => trimmed,
    };
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| VoiceError::InvalidAudio(e.to_string()))?;
    if bytes.is_empty() {
        return Err(VoiceError::InvalidAudio("decoded audio is empty".into()));
    }
    Ok(bytes)
}

pub fn encode_audio(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
