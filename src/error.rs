use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;
use crate::llm::LlmError as CompletionError;
use crate::transcript::TranscriptError;

pub const MISSING_INPUT_MESSAGE: &str = "Please enter both your API key and a valid URL.";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL entered.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(&'static str),

    #[error("Could not fetch YouTube transcript: {0}")]
    TranscriptUnavailable(#[from] TranscriptError),

    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("LLM processing error: {0}")]
    LlmError(#[from] CompletionError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Short message for the error panel.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::ValidationError(msg) => msg,
            AppError::TranscriptUnavailable(_) => "Could not fetch YouTube transcript.",
            AppError::FetchError(_) => "Could not fetch the webpage.",
            AppError::LlmError(_) => "Error during summarization.",
            AppError::ConfigError(_) => "Server is misconfigured.",
        }
    }

    /// Underlying error text, shown to the user as diagnostic detail.
    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::ValidationError(_) => None,
            AppError::TranscriptUnavailable(e) => Some(e.to_string()),
            AppError::FetchError(msg) | AppError::ConfigError(msg) => Some(msg.clone()),
            AppError::LlmError(e) => Some(e.to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::TranscriptUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::FetchError(_) | AppError::LlmError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        response::error::<()>(self.status_code(), self.message(), self.detail()).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
