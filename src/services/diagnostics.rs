use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bon::Builder;
use strum::Display;
use tracing::{info, warn};

use crate::services::ask_ai::AskAi;
use crate::services::chat_api_http::HttpChatApi;

pub const DEFAULT_CHECK_QUESTION: &str = "What is Tapnex?";
/// First answers after a cold start can take a minute.
pub const CHECK_CHAT_TIMEOUT: Duration = Duration::from_secs(90);

/// Words that show up in answers when the backend failed internally but still replied 200.
const FAILURE_MARKERS: [&str; 2] = ["error", "sorry"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StepOutcome {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone)]
pub struct CheckStep {
    pub name: &'static str,
    pub outcome: StepOutcome,
    pub detail: String,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub steps: Vec<CheckStep>,
}

impl CheckReport {
    /// Passed when no step failed. Skipped steps are tolerated.
    pub fn passed(&self) -> bool {
        !self.steps.iter().any(|s| s.outcome == StepOutcome::Failed)
    }

    pub fn step(&self, name: &str) -> Option<&CheckStep> {
        self.steps.iter().find(|s| s.name == name)
    }

    fn push(&mut self, name: &'static str, outcome: StepOutcome, detail: String, started: Instant) {
        info!(step = name, outcome = %outcome, detail = %detail, "check: step finished");
        self.steps.push(CheckStep { name, outcome, detail, elapsed: started.elapsed() });
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.steps.iter().enumerate() {
            writeln!(
                f,
                "{}. {:<7} {:<8} ({:.1}s) {}",
                i + 1,
                s.name,
                s.outcome,
                s.elapsed.as_secs_f32(),
                s.detail
            )?;
        }
        write!(f, "{}", if self.passed() { "System is working" } else { "System needs attention" })
    }
}

/// End-to-end probe of a deployed backend: health, warmup, one real question.
#[derive(Builder)]
pub struct Diagnostics {
    api: HttpChatApi,
    #[builder(default = CHECK_CHAT_TIMEOUT)]
    chat_timeout: Duration,
}

impl Diagnostics {
    pub async fn check(&self, question: &str) -> CheckReport {
        let mut report = CheckReport::default();

        let started = Instant::now();
        match self.api.health().await {
            Ok(h) => {
                let rag = h.rag_enabled.map_or("unknown".to_string(), |r| r.to_string());
                report.push("health", StepOutcome::Passed, format!("RAG enabled: {}", rag), started);
            }
            Err(e) => {
                report.push("health", StepOutcome::Failed, e.to_string(), started);
                let now = Instant::now();
                report.push("warmup", StepOutcome::Skipped, "health check failed".to_string(), now);
                report.push("chat", StepOutcome::Skipped, "health check failed".to_string(), now);
                return report;
            }
        }

        // Older deployments have no /warmup; that is not fatal
        let started = Instant::now();
        match self.api.warmup().await {
            Ok(w) => report.push(
                "warmup",
                StepOutcome::Passed,
                w.message.unwrap_or_else(|| "No message".to_string()),
                started,
            ),
            Err(e) => {
                warn!(error = %e, "check: warmup unavailable");
                report.push("warmup", StepOutcome::Skipped, e.to_string(), started);
            }
        }

        let started = Instant::now();
        let ask = AskAi::builder()
            .chat_api(Arc::new(self.api.clone()))
            .timeout(self.chat_timeout)
            .build();
        match ask.try_ask(question).await {
            Ok(answer) if looks_like_backend_failure(answer.as_str()) => {
                report.push("chat", StepOutcome::Failed, format!("backend error: {}", preview(answer.as_str())), started)
            }
            Ok(answer) => report.push("chat", StepOutcome::Passed, preview(answer.as_str()), started),
            Err(e) => report.push("chat", StepOutcome::Failed, e.to_string(), started),
        }

        report
    }
}

fn looks_like_backend_failure(answer: &str) -> bool {
    let lower = answer.to_lowercase();
    FAILURE_MARKERS.iter().any(|m| lower.contains(m))
}

fn preview(text: &str) -> String {
    let mut s: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        s.push_str("...");
    }
    s
}
