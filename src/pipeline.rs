use std::fmt;
use std::sync::Arc;

use crate::classifier::{classify, is_well_formed, UrlKind};
use crate::document::{Credential, Document, Summary};
use crate::error::{AppError, Result, INVALID_URL_MESSAGE, MISSING_INPUT_MESSAGE};
use crate::llm::CompletionModel;
use crate::summarizer::Summarizer;
use crate::transcript::{TranscriptFetcher, TranscriptSource};
use crate::webpage::PageLoader;

/// Form values for one submission. Built fresh per request and dropped afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    pub credential: Credential,
    pub url: String,
}

impl Session {
    pub fn new(credential: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(credential),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Validating,
    Fetching,
    Summarizing,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Validating => "validating",
            PipelineState::Fetching => "fetching",
            PipelineState::Summarizing => "summarizing",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub url: String,
    pub source: UrlKind,
    pub word_count: usize,
    pub summary: Summary,
}

/// Validate, fetch, summarize. Every call is independent; nothing is cached.
pub struct Pipeline {
    transcripts: TranscriptFetcher,
    pages: Arc<dyn PageLoader>,
    summarizer: Summarizer,
}

impl Pipeline {
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>,
        pages: Arc<dyn PageLoader>,
        model: Arc<dyn CompletionModel>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            transcripts: TranscriptFetcher::new(transcripts),
            pages,
            summarizer: Summarizer::new(model, model_name),
        }
    }

    pub async fn run(&self, session: &Session) -> Result<Outcome> {
        let mut state = PipelineState::Idle;
        let result = self.drive(session, &mut state).await;

        match &result {
            Ok(outcome) => {
                transition(&mut state, PipelineState::Done);
                tracing::info!(url = %outcome.url, words = outcome.word_count, "Summary ready");
            }
            Err(err) => {
                let failed_in = state;
                transition(&mut state, PipelineState::Failed);
                tracing::warn!(url = %session.url, %failed_in, error = %err, "Request failed");
            }
        }
        result
    }

    async fn drive(&self, session: &Session, state: &mut PipelineState) -> Result<Outcome> {
        transition(state, PipelineState::Validating);
        let url = validate(session)?;

        transition(state, PipelineState::Fetching);
        let source = classify(url);
        let documents = self.fetch(url, source).await?;

        transition(state, PipelineState::Summarizing);
        let word_count = documents.iter().map(Document::word_count).sum();
        let summary = self
            .summarizer
            .summarize(&documents, &session.credential)
            .await?;

        Ok(Outcome {
            url: url.to_string(),
            source,
            word_count,
            summary,
        })
    }

    async fn fetch(&self, url: &str, source: UrlKind) -> Result<Vec<Document>> {
        let documents = match source {
            UrlKind::YouTube => self.transcripts.fetch(url).await?,
            UrlKind::Generic => self.pages.load(&[url.to_string()]).await?,
        };

        if documents.is_empty() {
            return Err(AppError::FetchError("no documents extracted".to_string()));
        }
        Ok(documents)
    }
}

fn validate(session: &Session) -> Result<&str> {
    let url = session.url.trim();
    if session.credential.is_empty() || url.is_empty() {
        return Err(AppError::ValidationError(MISSING_INPUT_MESSAGE));
    }
    if !is_well_formed(url) {
        return Err(AppError::ValidationError(INVALID_URL_MESSAGE));
    }
    Ok(url)
}

fn transition(state: &mut PipelineState, next: PipelineState) {
    tracing::debug!(from = %state, to = %next, "Pipeline transition");
    *state = next;
}
