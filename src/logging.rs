use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::services::settings::LoggingConfig;

/// Initializes structured logging on stderr, plus a log file when configured.
///
/// The filter comes from `RUST_LOG`, then `logging.level`, then `info`. Keep the
/// returned guard alive for the whole process or buffered file lines are lost.
pub fn init_logging(cfg: Option<&LoggingConfig>) -> Option<WorkerGuard> {
    let log_spec = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| cfg.and_then(|c| c.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::new(log_spec);

    match cfg.and_then(|c| c.file.as_deref()).map(Path::new) {
        Some(path) => {
            let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "askai.log".into());
            let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .compact()
                .with_writer(std::io::stderr.and(file_writer))
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}
