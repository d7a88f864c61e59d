use url::Url;

use crate::models::errors::AskError;

/// Local backend that relative bases resolve against when no origin is configured.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

pub const CHAT_ROUTE: &str = "chat";
pub const HEALTH_ROUTE: &str = "health";
pub const WARMUP_ROUTE: &str = "warmup";

/// Builds `{base}/{route}`.
///
/// `base` is either an absolute http(s) URL or a path starting with `/`, which is
/// resolved against `origin` (default [`DEFAULT_ORIGIN`]). No network access happens here.
pub fn resolve_endpoint(base: Option<&str>, origin: Option<&str>, route: &str) -> Result<Url, AskError> {
    let base = base.map(str::trim).filter(|b| !b.is_empty()).ok_or(AskError::ConfigurationMissing)?;

    let base_url = if base.starts_with('/') {
        let origin = origin.map(str::trim).filter(|o| !o.is_empty()).unwrap_or(DEFAULT_ORIGIN);
        let origin_url = parse_http(origin)?;
        origin_url.join(base).map_err(|e| invalid(base, e.to_string()))?
    } else {
        parse_http(base)?
    };

    let mut dir = base_url;
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir.join(route).map_err(|e| invalid(base, e.to_string()))
}

fn parse_http(raw: &str) -> Result<Url, AskError> {
    let url = Url::parse(raw).map_err(|e| invalid(raw, e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        other => Err(invalid(raw, format!("unsupported scheme `{}`", other))),
    }
}

fn invalid(base: &str, reason: String) -> AskError {
    AskError::InvalidEndpoint { base: base.to_string(), reason }
}
