use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use futures_util::future::join_all;
use tracing::{error, info, warn};

use crate::models::errors::AskError;
use crate::models::types::{Answer, Question};
use crate::services::settings::{DEFAULT_PREVIEW_CHARS, DEFAULT_REQUEST_TIMEOUT_MS};
use crate::traits::chat_api::ChatApi;

pub const TIMEOUT_MESSAGE: &str = "The request timed out. The AI might be taking too long to respond. Please try again with a simpler question or check out the traditional portfolio page.";

pub const FALLBACK_MESSAGE: &str = "I'm sorry, I'm having trouble connecting to the AI service right now. Please try again later or check out the traditional portfolio page.";

/// Asks the portfolio assistant a question.
///
/// Every call is a single attempt: one request bounded by `timeout`. When the wait
/// expires the in-flight request future is dropped, which aborts the HTTP exchange
/// and releases the timer.
#[derive(Builder, Clone)]
pub struct AskAi {
    chat_api: Arc<dyn ChatApi>,
    #[builder(default = Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS))]
    timeout: Duration,
    #[builder(default = DEFAULT_PREVIEW_CHARS)]
    preview_chars: usize,
}

impl AskAi {
    /// Returns the backend's answer or one of the two fallback messages. Never fails.
    pub async fn ask(&self, question: &str) -> String {
        match self.try_ask(question).await {
            Ok(answer) => answer.into_inner(),
            Err(e) => fallback_for(&e).to_string(),
        }
    }

    /// Asks several questions at once. Calls are independent; answers come back in input order.
    pub async fn ask_all(&self, questions: &[String]) -> Vec<String> {
        join_all(questions.iter().map(|q| self.ask(q))).await
    }

    /// Same exchange as [`AskAi::ask`] with the failure kept typed.
    pub async fn try_ask(&self, question: &str) -> Result<Answer, AskError> {
        let question = Question::from(question);
        info!(question_len = question.len(), timeout_ms = self.timeout.as_millis() as u64, "ask: start");

        let result = match tokio::time::timeout(self.timeout, self.chat_api.call_chat_api(&question)).await {
            Ok(reply) => reply.and_then(|r| r.into_answer()),
            Err(_) => Err(AskError::Timeout(self.timeout)),
        };

        match &result {
            Ok(answer) => {
                let preview: String = answer.as_str().chars().take(self.preview_chars).collect();
                info!(answer_len = answer.len(), answer_preview = %preview, "ask: answered");
            }
            Err(e) if e.is_timeout() => {
                warn!(kind = e.kind().as_str(), error = %e, "ask: request aborted");
            }
            Err(e) => {
                error!(kind = e.kind().as_str(), error = %e, "Error calling AI API");
                if let AskError::Upstream { body, .. } = e {
                    error!(body = %body, "Error details");
                }
            }
        }
        result
    }
}

/// User-facing text for a failed ask.
pub fn fallback_for(e: &AskError) -> &'static str {
    if e.is_timeout() { TIMEOUT_MESSAGE } else { FALLBACK_MESSAGE }
}
