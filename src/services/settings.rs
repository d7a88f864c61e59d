use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the chat backend base location.
pub const BASE_URL_ENV: &str = "RAG_API_URL";
/// Environment variable overriding the origin used for relative base paths.
pub const ORIGIN_ENV: &str = "RAG_API_ORIGIN";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChatConfig {
    pub base_url: Option<String>,                // https://portfolio.example.com or /api
    pub origin: Option<String>,                  // only used when base_url is a relative path
    pub request_timeout_ms: Option<u64>,         // bounded wait per question
    pub log_answer_preview_chars: Option<usize>, // how much of an answer to log
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>, // EnvFilter directive, RUST_LOG wins
    pub file: Option<String>,  // also write logs to this file
}

impl ChatConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS))
    }

    pub fn preview_chars(&self) -> usize {
        self.log_answer_preview_chars.unwrap_or(DEFAULT_PREVIEW_CHARS)
    }
}

impl AppConfig {
    /// Configuration built from the process environment alone.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies `RAG_API_URL` / `RAG_API_ORIGIN` on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |v: String| if v.trim().is_empty() { None } else { Some(v) };
        if let Some(url) = lookup(BASE_URL_ENV).and_then(non_blank) {
            self.chat.base_url = Some(url);
        }
        if let Some(origin) = lookup(ORIGIN_ENV).and_then(non_blank) {
            self.chat.origin = Some(origin);
        }
        self
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, Box<dyn std::error::Error + Send + Sync>> {
    let content = fs::read_to_string(path)?;
    let cfg: AppConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}
