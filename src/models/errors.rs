use std::time::Duration;

use derive_more::Display;
use strum::{EnumIter, IntoStaticStr};

/// Failure of a single ask. Never shown to the end user: `AskAi::ask`
/// collapses every variant into one of the fallback messages.
#[derive(Debug, Display)]
pub enum AskError {
    /// Base endpoint is not configured
    #[display("chat API URL is not configured (set RAG_API_URL)")]
    ConfigurationMissing,
    /// Base endpoint is configured but cannot be turned into a URL
    #[display("invalid chat API base {base:?}: {reason}")]
    InvalidEndpoint { base: String, reason: String },
    /// Bounded wait exceeded, request aborted
    #[display("request timed out after {}ms", _0.as_millis())]
    Timeout(Duration),
    /// Connection refused, DNS, reset, ...
    #[display("transport error: {_0}")]
    Transport(String),
    /// Non-2xx status from the backend
    #[display("HTTP error! status: {status}")]
    Upstream { status: u16, body: serde_json::Value },
    /// Body is not the expected JSON, or `answer` is missing/blank
    #[display("malformed response: {_0}")]
    MalformedResponse(String),
}

impl std::error::Error for AskError {}

/// Coarse classification used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Timeout,
    Transport,
    Upstream,
    MalformedResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl AskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AskError::ConfigurationMissing | AskError::InvalidEndpoint { .. } => ErrorKind::Configuration,
            AskError::Timeout(_) => ErrorKind::Timeout,
            AskError::Transport(_) => ErrorKind::Transport,
            AskError::Upstream { .. } => ErrorKind::Upstream,
            AskError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

impl From<reqwest::Error> for AskError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            // the configured limit is unknown here, see `chat_api_http::bounded`
            AskError::Timeout(Duration::ZERO)
        } else if e.is_decode() {
            AskError::MalformedResponse(e.to_string())
        } else {
            AskError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AskError {
    fn from(e: serde_json::Error) -> Self {
        AskError::MalformedResponse(e.to_string())
    }
}
