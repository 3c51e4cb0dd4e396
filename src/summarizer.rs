use std::sync::Arc;

use crate::document::{Credential, Document, Summary};
use crate::llm::{CompletionModel, LlmError};

pub const PROMPT_TEMPLATE: &str = "Provide a summary of the following content in ~300 words:\n{text}";

const DOCUMENT_SEPARATOR: &str = "\n\n";

/// "Stuff" summarization: every document goes into one prompt and one call.
pub struct Summarizer {
    model: Arc<dyn CompletionModel>,
    model_name: String,
}

impl Summarizer {
    pub fn new(model: Arc<dyn CompletionModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    pub async fn summarize(&self, documents: &[Document], credential: &Credential) -> Result<Summary, LlmError> {
        if documents.is_empty() {
            return Err(LlmError::NoContent);
        }

        let prompt = build_prompt(documents);
        tracing::info!(
            model = %self.model_name,
            documents = documents.len(),
            prompt_chars = prompt.len(),
            "Calling LLM API"
        );

        self.model
            .complete(&prompt, &self.model_name, credential)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))
    }
}

pub fn build_prompt(documents: &[Document]) -> String {
    let text = documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR);

    PROMPT_TEMPLATE.replace("{text}", &text)
}
