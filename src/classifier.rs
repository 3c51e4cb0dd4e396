use serde::Serialize;
use url::Url;

const YOUTUBE_DOMAIN: &str = "youtube.com";

/// Which fetcher a URL is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UrlKind {
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "webpage")]
    Generic,
}

pub fn classify(url: &str) -> UrlKind {
    if url.contains(YOUTUBE_DOMAIN) {
        UrlKind::YouTube
    } else {
        UrlKind::Generic
    }
}

/// Syntax check only: absolute http(s) URL with a host. Reachability is not probed.
pub fn is_well_formed(url: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
