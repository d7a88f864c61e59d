use async_trait::async_trait;

use crate::models::errors::AskError;
use crate::models::types::{ChatResponse, Question};

/// Defines the interface for the remote chat backend that answers portfolio questions.
///
/// This trait allows consumers to abstract over different backend implementations
/// (e.g., the real HTTP client, in-process doubles for testing).
///
/// Implementations perform exactly one exchange per call and never retry. The bounded
/// wait is applied by the caller, so an implementation may be cancelled at any await point.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends a question to the backend and returns its decoded reply.
    async fn call_chat_api(&self, question: &Question) -> Result<ChatResponse, AskError>;
}
