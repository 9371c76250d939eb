use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("invalid audio payload: {0}")]
    InvalidAudio(String),

    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} returned no audio")]
    EmptyAudio(&'static str),
}
