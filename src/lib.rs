pub mod api;
pub mod classifier;
pub mod config;
pub mod document;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod summarizer;
pub mod transcript;
pub mod webpage;

use std::sync::Arc;

use config::Config;
use llm::ChatCompletionClient;
use pipeline::Pipeline;
use transcript::YouTubeTranscriptClient;
use webpage::WebPageLoader;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Wires the HTTP-backed capabilities described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transcripts = YouTubeTranscriptClient::new(
            config.fetch_user_agent.clone(),
            config.transcript_languages.clone(),
        )?;
        let pages = WebPageLoader::new(&config.fetch_user_agent)?;
        let model = ChatCompletionClient::new(config.llm_base_url.clone())?;

        let pipeline = Pipeline::new(
            Arc::new(transcripts),
            Arc::new(pages),
            Arc::new(model),
            config.llm_model.clone(),
        );
        Ok(Self::new(pipeline))
    }
}
