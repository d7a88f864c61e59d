use bon::bon;
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use crate::models::errors::AskError;

/// Вопрос пользователя. Empty text is allowed and sent as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into, Display, AsRef, FromStr)]
pub struct Question(String);

impl From<&str> for Question {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[bon]
impl Question {
    #[builder]
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validated answer from the chat backend: never blank, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Into, Display, AsRef)]
pub struct Answer(String);

impl Answer {
    /// Accepts `text` unless it is blank after trimming. The stored value is not trimmed.
    pub fn parse(text: String) -> Option<Self> {
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Body of `POST {base}/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

impl From<&Question> for ChatRequest {
    fn from(q: &Question) -> Self {
        Self { question: q.as_str().to_string() }
    }
}

/// Reply of the chat backend. Only `answer` is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

impl ChatResponse {
    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self { answer: Some(answer.into()) }
    }

    pub fn into_answer(self) -> Result<Answer, AskError> {
        match self.answer {
            None => Err(AskError::MalformedResponse("missing `answer` field".to_string())),
            Some(text) => Answer::parse(text)
                .ok_or_else(|| AskError::MalformedResponse("empty `answer` from API".to_string())),
        }
    }
}

/// Reply of `GET {base}/health`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rag_enabled: Option<bool>,
}

/// Reply of `GET {base}/warmup`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarmupStatus {
    #[serde(default)]
    pub message: Option<String>,
}
