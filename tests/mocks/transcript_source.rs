use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url_summarizer::transcript::{TranscriptError, TranscriptSnippet, TranscriptSource};

#[derive(Clone)]
pub struct MockTranscriptSource {
    pub snippets: Vec<TranscriptSnippet>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub disabled: bool,
}

impl MockTranscriptSource {
    pub fn new(texts: &[&str]) -> Self {
        let snippets = texts
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptSnippet {
                text: text.to_string(),
                start: i as f64 * 2.0,
                duration: 2.0,
            })
            .collect();

        Self {
            snippets,
            calls: Arc::new(Mutex::new(Vec::new())),
            disabled: false,
        }
    }

    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::new(&[])
        }
    }
}

#[async_trait]
impl TranscriptSource for MockTranscriptSource {
    async fn get_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSnippet>, TranscriptError> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if self.disabled {
            return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
        }
        Ok(self.snippets.clone())
    }
}
