use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use scraper::{ElementRef, Html, Node, Selector};

use crate::document::Document;
use crate::error::{AppError, Result};

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

// Subtrees that never carry readable page text.
const SKIP_TAGS: [&str; 5] = ["script", "style", "noscript", "svg", "template"];

/// Converts URLs into plain-text documents.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, urls: &[String]) -> Result<Vec<Document>>;
}

pub struct WebPageLoader {
    client: Client,
}

impl WebPageLoader {
    /// Remote TLS certificates are not verified.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(user_agent)
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self { client })
    }

    async fn load_one(&self, url: &str) -> Result<Document> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FetchError(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let kind = body_kind(&content_type).ok_or_else(|| {
            AppError::FetchError(format!("unsupported content type: {}", content_type))
        })?;

        let body = response.text().await?;
        tracing::debug!(url, %content_type, bytes = body.len(), "Fetched page");

        let text = match kind {
            BodyKind::Html => html_to_text(&body),
            BodyKind::PlainText => body.trim().to_string(),
        };

        Ok(Document::new(text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Html,
    PlainText,
}

/// `None` for media types that are not text (PDF, images, octet streams).
/// A missing header is treated as HTML.
fn body_kind(content_type: &str) -> Option<BodyKind> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match media_type.as_str() {
        "" | "text/html" | "application/xhtml+xml" => Some(BodyKind::Html),
        "application/json" => Some(BodyKind::PlainText),
        other if other.starts_with("text/") => Some(BodyKind::PlainText),
        _ => None,
    }
}

#[async_trait]
impl PageLoader for WebPageLoader {
    async fn load(&self, urls: &[String]) -> Result<Vec<Document>> {
        let mut documents = Vec::with_capacity(urls.len());
        for url in urls {
            documents.push(self.load_one(url).await?);
        }

        if documents.iter().all(Document::is_blank) {
            return Err(AppError::FetchError("no extractable text".to_string()));
        }
        Ok(documents)
    }
}

/// Reduces an HTML page to its visible text, one line per text node.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    collect_text(root, &mut lines);
    format_lines(&lines)
}

fn collect_text(element: ElementRef, lines: &mut Vec<String>) {
    if SKIP_TAGS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !normalized.is_empty() {
                    lines.push(normalized);
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, lines);
                }
            }
            _ => {}
        }
    }
}

fn format_lines(lines: &[String]) -> String {
    let mut result = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str(line);
    }
    result
}
