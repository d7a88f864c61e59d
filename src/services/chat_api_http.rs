use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::models::errors::AskError;
use crate::models::types::{ChatRequest, ChatResponse, HealthStatus, Question, WarmupStatus};
use crate::services::endpoint::{CHAT_ROUTE, HEALTH_ROUTE, WARMUP_ROUTE, resolve_endpoint};
use crate::services::settings::ChatConfig;
use crate::traits::chat_api::ChatApi;

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
pub const WARMUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Talks to the portfolio chat backend over HTTP.
///
/// The base location is kept unresolved so that a missing or broken configuration
/// surfaces per call as an [`AskError`] instead of failing construction.
#[derive(Builder, Clone)]
pub struct HttpChatApi {
    #[builder(default)]
    client: Client,
    base_url: Option<String>,
    origin: Option<String>,
}

impl HttpChatApi {
    pub fn from_config(cfg: &ChatConfig) -> Result<Self, AskError> {
        let client = Client::builder()
            .user_agent(format!("askai/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::builder()
            .client(client)
            .maybe_base_url(cfg.base_url.clone())
            .maybe_origin(cfg.origin.clone())
            .build())
    }

    fn endpoint(&self, route: &str) -> Result<url::Url, AskError> {
        resolve_endpoint(self.base_url.as_deref(), self.origin.as_deref(), route)
    }

    /// `GET {base}/health`.
    pub async fn health(&self) -> Result<HealthStatus, AskError> {
        let url = self.endpoint(HEALTH_ROUTE)?;
        info!(url = %url, "health: request");
        let response = self
            .client
            .get(url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| bounded(HEALTH_TIMEOUT, e))?;
        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            error!(status = status.as_u16(), body = %body, "health: API error");
            return Err(AskError::Upstream { status: status.as_u16(), body });
        }
        let health: HealthStatus = serde_json::from_str(&response.text().await?)?;
        info!(status = ?health.status, rag_enabled = ?health.rag_enabled, "health: ok");
        Ok(health)
    }

    /// `GET {base}/warmup`. Backends load their models lazily, so this can be slow.
    pub async fn warmup(&self) -> Result<WarmupStatus, AskError> {
        let url = self.endpoint(WARMUP_ROUTE)?;
        info!(url = %url, "warmup: request");
        let response = self
            .client
            .get(url)
            .timeout(WARMUP_TIMEOUT)
            .send()
            .await
            .map_err(|e| bounded(WARMUP_TIMEOUT, e))?;
        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            error!(status = status.as_u16(), body = %body, "warmup: API error");
            return Err(AskError::Upstream { status: status.as_u16(), body });
        }
        let warmup: WarmupStatus = serde_json::from_str(&response.text().await?)?;
        info!(message = ?warmup.message, "warmup: done");
        Ok(warmup)
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn call_chat_api(&self, question: &Question) -> Result<ChatResponse, AskError> {
        let url = self.endpoint(CHAT_ROUTE)?;
        info!(url = %url, question_len = question.len(), "chat: request");

        let response = self
            .client
            .post(url)
            .json(&ChatRequest::from(question))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP error sending chat request");
                AskError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            error!(status = status.as_u16(), body = %body, "API error");
            return Err(AskError::Upstream { status: status.as_u16(), body });
        }

        let text = response.text().await?;
        debug!(body_len = text.len(), "chat: response body received");
        serde_json::from_str::<ChatResponse>(&text).map_err(|e| {
            error!(error = %e, body = %text, "chat: undecodable response body");
            AskError::from(e)
        })
    }
}

fn bounded(limit: Duration, e: reqwest::Error) -> AskError {
    if e.is_timeout() { AskError::Timeout(limit) } else { AskError::from(e) }
}

/// Best-effort JSON error body, `{}` when it cannot be read or parsed.
async fn error_body(response: reqwest::Response) -> serde_json::Value {
    response
        .json::<serde_json::Value>()
        .await
        .unwrap_or_else(|_| serde_json::json!({}))
}
