use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use reqwest::{Client, ClientBuilder};

use crate::document::Credential;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "gemma2-9b-it";

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format from LLM")]
    EmptyResponse,

    #[error("No content to summarize")]
    NoContent,
}

/// Remote text completion. Model output is returned untouched.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str, model: &str, credential: &Credential) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client (Groq by default).
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
}

impl ChatCompletionClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LlmError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CompletionModel for ChatCompletionClient {
    async fn complete(&self, prompt: &str, model: &str, credential: &Credential) -> Result<String, LlmError> {
        let body = ChatRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let message = match res.text().await {
                Ok(body) => body,
                Err(e) => format!("failed to read error body: {}", e),
            };
            tracing::warn!(status, "LLM API returned an error");
            return Err(LlmError::Api { status, message });
        }

        let response = res.json::<ChatResponse>().await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_single_user_message() {
        let body = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gemma2-9b-it",
                "messages": [{ "role": "user", "content": "hi" }]
            })
        );
    }

    #[test]
    fn response_content_is_read_from_first_choice() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"A summary."},"finish_reason":"stop"}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("A summary."));
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let client = ChatCompletionClient::new("https://api.example.com/v1/").unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }
}
