use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Server settings. The LLM API key is not here: users enter it per request.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub llm_base_url: String,
    pub llm_model: String,
    pub transcript_languages: Vec<String>,
    pub fetch_user_agent: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let llm_base_url = lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if url::Url::parse(&llm_base_url).is_err() {
            return Err(AppError::ConfigError(format!("Invalid LLM_BASE_URL: {}", llm_base_url)));
        }

        let llm_model = lookup("LLM_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let transcript_languages: Vec<String> = lookup("TRANSCRIPT_LANGUAGES")
            .unwrap_or_else(|| "en".to_string())
            .split(',')
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
            .collect();
        if transcript_languages.is_empty() {
            return Err(AppError::ConfigError("TRANSCRIPT_LANGUAGES must name at least one language".to_string()));
        }

        let fetch_user_agent = lookup("FETCH_USER_AGENT").unwrap_or_else(|| "Mozilla/5.0".to_string());

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            llm_base_url,
            llm_model,
            transcript_languages,
            fetch_user_agent,
        })
    }
}
