use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::classifier::UrlKind;

/// Form submission from the summarize page.
#[derive(Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub source: UrlKind,
    pub summary: String,
    pub word_count: usize,
    pub summarized_at: DateTime<Utc>,
}
