//! Logging Infrastructure
//!
//! `RUST_LOG` takes precedence over the level passed in. Logs go to stdout,
//! or to a daily rolling file when a log directory is given.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Log file prefix inside the log directory
const LOG_FILE_PREFIX: &str = "booking-client";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON format and file output
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&Path>) {
    let filter = build_filter(log_level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = match log_dir.filter(|dir| prepare_dir(dir)) {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let builder = builder.with_writer(file_appender).with_ansi(false);
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        None if json => builder.json().try_init(),
        None => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}

fn build_filter(log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 日志目录不存在时创建
fn prepare_dir(dir: &Path) -> bool {
    if dir.exists() {
        return true;
    }
    match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Failed to create log dir {}: {e}", dir.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_dir_creates_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("logs").join("client");
        assert!(prepare_dir(&dir));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger_with_file(Some("debug"), false, None);
        init_logger();
    }
}
