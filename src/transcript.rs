use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::document::Document;

const WATCH_URL: &str = "https://www.youtube.com/watch";

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"v=([a-zA-Z0-9_-]+)").expect("Failed to compile video id pattern")
});

static PLAYER_RESPONSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ytInitialPlayerResponse\s*=\s*").expect("Failed to compile player response pattern")
});

static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("Failed to compile entity pattern")
});

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]*>").expect("Failed to compile tag pattern")
});

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No transcript found for video {video_id} in languages {requested:?}")]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
    },

    #[error("Transcript for video {0} is empty")]
    Empty(String),

    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse transcript data: {0}")]
    Parse(String),
}

/// One caption fragment as returned by the transcript service.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSnippet {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Converts a video identifier into its ordered caption fragments.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn get_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSnippet>, TranscriptError>;
}

/// Only the `v=<id>` form is recognised. Short links and embeds are rejected.
pub fn extract_video_id(url: &str) -> Result<String, TranscriptError> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(TranscriptError::InvalidUrl)
}

pub fn join_snippets(snippets: &[TranscriptSnippet]) -> String {
    snippets
        .iter()
        .map(|snippet| snippet.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn TranscriptSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<Document>, TranscriptError> {
        let video_id = extract_video_id(url)?;
        tracing::debug!(%video_id, "Requesting transcript");

        let snippets = self
            .source
            .get_transcript(&video_id)
            .await
            .inspect_err(|e| tracing::warn!(%video_id, error = %e, "Transcript service failed"))?;

        let text = join_snippets(&snippets);
        if text.trim().is_empty() {
            return Err(TranscriptError::Empty(video_id));
        }

        tracing::info!(%video_id, snippets = snippets.len(), chars = text.len(), "Transcript fetched");
        Ok(vec![Document::new(text)])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Transcript capability backed by the public YouTube watch page and its
/// timed-text caption tracks.
pub struct YouTubeTranscriptClient {
    client: Client,
    user_agent: String,
    languages: Vec<String>,
}

impl YouTubeTranscriptClient {
    pub fn new(user_agent: impl Into<String>, languages: Vec<String>) -> crate::error::Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
            languages,
        })
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, TranscriptError> {
        let html = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .header("User-Agent", &self.user_agent)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptClient {
    async fn get_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSnippet>, TranscriptError> {
        let html = self.fetch_watch_page(video_id).await?;
        let player = extract_player_response(&html, video_id)?;
        let tracks = caption_tracks(&player, video_id)?;
        let track = select_track(&tracks, &self.languages).ok_or_else(|| {
            TranscriptError::NoTranscriptFound {
                video_id: video_id.to_string(),
                requested: self.languages.clone(),
            }
        })?;

        tracing::debug!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let xml = self
            .client
            .get(track.base_url.replace("&fmt=srv3", ""))
            .header("User-Agent", &self.user_agent)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_timed_text(&xml)
    }
}

fn extract_player_response(html: &str, video_id: &str) -> Result<Value, TranscriptError> {
    let start = PLAYER_RESPONSE
        .find(html)
        .map(|m| m.end())
        .ok_or_else(|| TranscriptError::VideoUnavailable {
            video_id: video_id.to_string(),
            reason: "player response missing from watch page".to_string(),
        })?;

    // The object is followed by more script text, so decode a single value.
    serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| TranscriptError::Parse("empty player response".to_string()))?
        .map_err(|e| TranscriptError::Parse(e.to_string()))
}

fn caption_tracks(player: &Value, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    if let Some(status) = player.pointer("/playabilityStatus/status").and_then(Value::as_str) {
        if status != "OK" {
            let reason = player
                .pointer("/playabilityStatus/reason")
                .and_then(Value::as_str)
                .unwrap_or(status);
            return Err(TranscriptError::VideoUnavailable {
                video_id: video_id.to_string(),
                reason: reason.to_string(),
            });
        }
    }

    let tracks = player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .cloned()
        .ok_or_else(|| TranscriptError::TranscriptsDisabled(video_id.to_string()))?;

    let tracks: Vec<CaptionTrack> =
        serde_json::from_value(tracks).map_err(|e| TranscriptError::Parse(e.to_string()))?;

    if tracks.is_empty() {
        return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
    }
    Ok(tracks)
}

/// Languages are tried in priority order; within a language a manually
/// created track wins over an auto-generated one.
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        tracks
            .iter()
            .find(|t| t.language_code == *lang && !t.is_generated())
            .or_else(|| tracks.iter().find(|t| t.language_code == *lang))
    })
}

/// Empty bodies and documents without timed-text markup (consent pages,
/// HTML error pages) are parse errors, not empty transcripts.
fn parse_timed_text(xml: &str) -> Result<Vec<TranscriptSnippet>, TranscriptError> {
    if xml.trim().is_empty() {
        return Err(TranscriptError::Parse("empty caption response".to_string()));
    }

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut snippets = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;
    let mut saw_transcript = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"transcript" => {
                saw_transcript = true;
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                saw_transcript = true;
                let start = float_attribute(&e, b"start")?.unwrap_or(0.0);
                let duration = float_attribute(&e, b"dur")?.unwrap_or(0.0);
                current = Some((start, duration, String::new()));
            }
            Ok(Event::Text(t)) => {
                if let Some((_, _, raw)) = current.as_mut() {
                    let text = t.unescape().map_err(|e| TranscriptError::Parse(e.to_string()))?;
                    raw.push_str(&text);
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    let text = clean_caption_text(&raw);
                    if !text.is_empty() {
                        snippets.push(TranscriptSnippet {
                            text,
                            start,
                            duration,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TranscriptError::Parse(e.to_string())),
            _ => {}
        }
    }

    if !saw_transcript {
        return Err(TranscriptError::Parse(
            "caption response is not a timed-text document".to_string(),
        ));
    }
    Ok(snippets)
}

fn float_attribute(element: &BytesStart, name: &[u8]) -> Result<Option<f64>, TranscriptError> {
    let Some(attr) = element
        .try_get_attribute(name)
        .map_err(|e| TranscriptError::Parse(e.to_string()))?
    else {
        return Ok(None);
    };

    let value = attr
        .unescape_value()
        .map_err(|e| TranscriptError::Parse(e.to_string()))?;
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|e| TranscriptError::Parse(format!("bad timestamp {value:?}: {e}")))
}

// Caption text arrives HTML-escaped inside the XML, so one unescape is not enough.
fn clean_caption_text(raw: &str) -> String {
    let decoded = NUMERIC_ENTITY.replace_all(raw, |caps: &regex::Captures| {
        let code = &caps[1];
        let parsed = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        parsed
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    let decoded = decoded
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    MARKUP_TAG
        .replace_all(&decoded, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
