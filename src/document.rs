use std::fmt;

/// A unit of extracted plain text handed to the summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: String,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// LLM API key entered by the user for a single request.
///
/// `Debug` is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

pub type Summary = String;
