use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Minimum length of an OpenAI key before it is treated as usable.
pub const OPENAI_KEY_MIN_LEN: usize = 20;
/// ElevenLabs keys must be strictly longer than this.
pub const ELEVENLABS_KEY_MIN_LEN: usize = 10;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f32(profile: &str, key: &str, default: f32) -> f32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub voice: VoiceConfig,
    pub chunking: ChunkingConfig,
    pub manual: ManualConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `DOCQA_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("DOCQA_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            voice: VoiceConfig::from_env_profiled(p),
            chunking: ChunkingConfig::from_env_profiled(p),
            manual: ManualConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:    {}:{}, max_upload={}MB", self.server.host, self.server.port, self.server.max_upload_mb);
        tracing::info!("  llm:       chat={}, embedding={}, openai={}", self.llm.chat_model, self.llm.embedding_model, configured_label(self.llm.is_configured()));
        tracing::info!("  voice:     elevenlabs={}, tts={}/{}", configured_label(self.voice.elevenlabs_configured()), self.voice.tts_model, self.voice.tts_voice);
        tracing::info!("  chunking:  size={}, overlap={}, top_k={}", self.chunking.chunk_size, self.chunking.chunk_overlap, self.chunking.top_k);
        tracing::info!("  manual:    data_dir={}, model={}", self.manual.data_dir.display(), self.manual.chat_model);
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": { "host": self.server.host, "port": self.server.port },
            "llm": {
                "chat_model": self.llm.chat_model,
                "embedding_model": self.llm.embedding_model,
                "configured": self.llm.is_configured(),
            },
            "voice": {
                "elevenlabs_configured": self.voice.elevenlabs_configured(),
                "tts_model": self.voice.tts_model,
            },
            "chunking": {
                "chunk_size": self.chunking.chunk_size,
                "chunk_overlap": self.chunking.chunk_overlap,
                "top_k": self.chunking.top_k,
            },
            "manual": { "data_dir": self.manual.data_dir },
        })
    }
}

fn configured_label(configured: bool) -> &'static str {
    if configured { "configured" } else { "absent" }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a multipart upload body.
    pub max_upload_mb: usize,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 5001),
            max_upload_mb: profiled_env_usize(p, "MAX_UPLOAD_MB", 50),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

// ── LLM / embeddings (OpenAI) ─────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            chat_model: profiled_env_or(p, "CHAT_MODEL", "gpt-4.1-mini"),
            embedding_model: profiled_env_or(p, "EMBEDDING_MODEL", "text-embedding-3-small"),
            embedding_dimensions: profiled_env_usize(p, "EMBEDDING_DIMENSIONS", 1536),
            temperature: profiled_env_f32(p, "LLM_TEMPERATURE", 0.0),
            max_tokens: profiled_env_opt(p, "LLM_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            timeout_secs: profiled_env_u64(p, "LLM_TIMEOUT_SECS", 60),
        }
    }

    /// Credential probe: present and long enough to be a real key. No network call.
    pub fn is_configured(&self) -> bool {
        self.usable_key().is_some()
    }

    /// The OpenAI key, if it passes the capability probe.
    pub fn usable_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .filter(|k| k.len() >= OPENAI_KEY_MIN_LEN)
    }
}

// ── Voice ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_voice_id: String,
    pub elevenlabs_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub transcription_model: String,
    pub synthesis_timeout_secs: u64,
}

impl VoiceConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            elevenlabs_api_key: profiled_env_opt(p, "ELEVENLABS_API_KEY"),
            elevenlabs_base_url: profiled_env_or(p, "ELEVENLABS_BASE_URL", "https://api.elevenlabs.io"),
            elevenlabs_voice_id: profiled_env_or(p, "ELEVENLABS_VOICE_ID", "21m00Tcm4TlvDq8ikWAM"),
            elevenlabs_model: profiled_env_or(p, "ELEVENLABS_MODEL", "eleven_monolingual_v1"),
            tts_model: profiled_env_or(p, "TTS_MODEL", "tts-1"),
            tts_voice: profiled_env_or(p, "TTS_VOICE", "alloy"),
            transcription_model: profiled_env_or(p, "TRANSCRIPTION_MODEL", "whisper-1"),
            synthesis_timeout_secs: profiled_env_u64(p, "SYNTHESIS_TIMEOUT_SECS", 30),
        }
    }

    pub fn elevenlabs_configured(&self) -> bool {
        self.usable_elevenlabs_key().is_some()
    }

    pub fn usable_elevenlabs_key(&self) -> Option<&str> {
        self.elevenlabs_api_key
            .as_deref()
            .filter(|k| k.len() > ELEVENLABS_KEY_MIN_LEN)
    }
}

// ── Chunking / retrieval ──────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl ChunkingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            chunk_size: profiled_env_usize(p, "CHUNK_SIZE", 1000),
            chunk_overlap: profiled_env_usize(p, "CHUNK_OVERLAP", 200),
            top_k: profiled_env_usize(p, "RETRIEVAL_TOP_K", 3),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 3,
        }
    }
}

// ── Preloaded manual ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualConfig {
    /// Directory holding `poh_content.json` and `poh_chunks.json`.
    pub data_dir: PathBuf,
    pub chat_model: String,
    pub top_k: usize,
}

impl ManualConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            data_dir: PathBuf::from(profiled_env_or(p, "MANUAL_DATA_DIR", "data")),
            chat_model: profiled_env_or(p, "MANUAL_CHAT_MODEL", "gpt-3.5-turbo"),
            top_k: profiled_env_usize(p, "MANUAL_TOP_K", 5),
        }
    }
}
