pub mod logging;
pub mod models;
pub mod services;
pub mod traits;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use crate::models::errors::AskError;
use crate::services::ask_ai::{AskAi, FALLBACK_MESSAGE};
use crate::services::chat_api_http::HttpChatApi;
use crate::services::settings::{AppConfig, load_config};

/// Asks the portfolio assistant using configuration from the environment (`RAG_API_URL`).
///
/// Always returns text: the answer, or a fallback message when anything goes wrong.
pub async fn ask_ai(question: &str) -> String {
    match build_ask_ai(&AppConfig::from_env()) {
        Ok(ai) => ai.ask(question).await,
        Err(e) => {
            error!(kind = e.kind().as_str(), error = %e, "Error calling AI API");
            FALLBACK_MESSAGE.to_string()
        }
    }
}

/// Wires the HTTP backend and the bounded wait from `cfg`.
pub fn build_ask_ai(cfg: &AppConfig) -> Result<AskAi, AskError> {
    let api = HttpChatApi::from_config(&cfg.chat)?;
    Ok(AskAi::builder()
        .chat_api(Arc::new(api))
        .timeout(cfg.chat.request_timeout())
        .preview_chars(cfg.chat.preview_chars())
        .build())
}

/// Loads the YAML file when given, then applies environment overrides.
pub fn load_app_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let cfg = match path {
        Some(p) => load_config(p)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Failed to load {}", p))?,
        None => AppConfig::default(),
    };
    Ok(cfg.with_env_overrides())
}

/// Logs the effective chat settings; call after logging is initialized.
pub fn log_config(cfg: &AppConfig) {
    info!(
        base_url = %cfg.chat.base_url.as_deref().unwrap_or("None"),
        origin = %cfg.chat.origin.as_deref().unwrap_or("None"),
        timeout_ms = cfg.chat.request_timeout().as_millis() as u64,
        "config loaded"
    );
}
