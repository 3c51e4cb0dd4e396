use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url_summarizer::document::Document;
use url_summarizer::error::{AppError, Result};
use url_summarizer::webpage::PageLoader;

#[derive(Clone)]
pub struct MockPageLoader {
    pub content: String,
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub fail_with: Option<String>,
}

impl MockPageLoader {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

#[async_trait]
impl PageLoader for MockPageLoader {
    async fn load(&self, urls: &[String]) -> Result<Vec<Document>> {
        self.calls.lock().unwrap().push(urls.to_vec());
        if let Some(ref msg) = self.fail_with {
            return Err(AppError::FetchError(msg.clone()));
        }
        Ok(urls.iter().map(|_| Document::new(self.content.clone())).collect())
    }
}
