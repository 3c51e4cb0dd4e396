use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url_summarizer::document::Credential;
use url_summarizer::llm::{CompletionModel, LlmError};

#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub prompt: String,
    pub model: String,
    pub credential: String,
}

#[derive(Clone)]
pub struct MockCompletionModel {
    pub replies: Vec<String>,
    pub calls: Arc<Mutex<Vec<CompletionCall>>>,
    pub fail_with: Option<(u16, String)>,
}

impl MockCompletionModel {
    pub fn new(reply: &str) -> Self {
        Self::with_replies(&[reply])
    }

    /// Replies are handed out in turn, wrapping around.
    pub fn with_replies(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(status: u16, msg: &str) -> Self {
        Self {
            fail_with: Some((status, msg.to_string())),
            ..Self::new("")
        }
    }
}

#[async_trait]
impl CompletionModel for MockCompletionModel {
    async fn complete(&self, prompt: &str, model: &str, credential: &Credential) -> Result<String, LlmError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(CompletionCall {
            prompt: prompt.to_string(),
            model: model.to_string(),
            credential: credential.expose().to_string(),
        });

        if let Some((status, message)) = &self.fail_with {
            return Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self.replies[(calls.len() - 1) % self.replies.len()].clone())
    }
}
