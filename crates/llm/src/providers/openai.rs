use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message};

/// OpenAI-compatible chat completions backend.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            })
            .collect();

        let body = json!({
            "model": self.model,
            "messages": api_messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        debug!("OpenAI request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::ParseError("missing choices[0].message.content".into()))?
            .trim();
        if content.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    type Captured = Arc<Mutex<Option<serde_json::Value>>>;

    /// Serve a fake `/v1/chat/completions` that records the request body.
    async fn fake_openai(status: StatusCode, reply: serde_json::Value) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(
                    move |State(seen): State<Captured>, Json(body): Json<serde_json::Value>| {
                        let reply = reply.clone();
                        async move {
                            *seen.lock().unwrap() = Some(body);
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    fn provider(base_url: String) -> OpenAiProvider {
        OpenAiProvider::new("sk-test".into(), "gpt-4.1-mini".into(), base_url, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let reply = json!({"choices": [{"message": {"role": "assistant", "content": "3400 lbs"}}]});
        let (url, captured) = fake_openai(StatusCode::OK, reply).await;

        let answer = provider(url)
            .complete(vec![Message::system("rules"), Message::user("max weight?")], 0.0, 50)
            .await
            .unwrap();
        assert_eq!(answer, "3400 lbs");

        let body = captured.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["max_tokens"], 50);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "max weight?");
    }

    #[tokio::test]
    async fn non_200_is_api_error() {
        let (url, _) = fake_openai(StatusCode::UNAUTHORIZED, json!({"error": "bad key"})).await;
        let err = provider(url).complete(vec![Message::user("hi")], 0.0, 10).await.unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 401, .. }));
    }

    #[tokio::test]
    async fn missing_content_is_parse_error() {
        let (url, _) = fake_openai(StatusCode::OK, json!({"choices": []})).await;
        let err = provider(url).complete(vec![Message::user("hi")], 0.0, 10).await.unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[tokio::test]
    async fn blank_content_is_empty_completion() {
        let reply = json!({"choices": [{"message": {"role": "assistant", "content": "  \n"}}]});
        let (url, _) = fake_openai(StatusCode::OK, reply).await;
        let err = provider(url).complete(vec![Message::user("hi")], 0.0, 10).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyCompletion));
    }
}
