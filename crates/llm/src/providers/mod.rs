pub mod openai;

use std::time::Duration;

use docqa_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Create a chat provider for `model`, or `NotConfigured` when the OpenAI key
/// is missing or fails the capability probe.
pub fn create_provider(llm_config: &LlmConfig, model: &str) -> Result<Box<dyn LlmProvider>, LlmError> {
    let api_key = llm_config
        .usable_key()
        .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set or too short".into()))?;
    let base_url = llm_config
        .openai_base_url
        .as_deref()
        .unwrap_or(DEFAULT_OPENAI_BASE_URL);
    Ok(Box::new(openai::OpenAiProvider::new(
        api_key.to_string(),
        model.to_string(),
        base_url.to_string(),
        Duration::from_secs(llm_config.timeout_secs),
    )))
}
