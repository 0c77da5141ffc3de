//! Logging Infrastructure
//!
//! Console output (pretty in development, JSON elsewhere) plus an optional
//! daily rotating file under `<log_dir>/app`. Rotated files older than
//! [`LOG_RETENTION_DAYS`] are removed by a background task.

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

use crate::BoxError;

pub const LOG_RETENTION_DAYS: i64 = 14;

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(level: &str) -> String {
    format!("seatplan_server={level},tower_http=info")
}

/// Remove `app-YYYY-MM-DD.log` files older than the retention window
///
/// Returns the number of deleted files.
pub fn cleanup_old_logs(log_dir: &Path, today: chrono::NaiveDate) -> Result<usize, BoxError> {
    let cutoff = today - chrono::Duration::days(LOG_RETENTION_DAYS);
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date_part) = name
            .strip_prefix("app.")
            .or_else(|| name.strip_prefix("app-"))
            .and_then(|d| d.strip_suffix(".log").or(Some(d)))
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// Initialize the global subscriber
///
/// * `level` - default level for this crate when `RUST_LOG` is unset
/// * `json_format` - JSON console output (non-development environments)
/// * `log_dir` - optional directory for the rolling application log
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&str>) -> Result<(), BoxError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let app_log_dir = Path::new(dir).join("app");
            fs::create_dir_all(&app_log_dir)?;

            let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
            tokio::spawn(periodic_cleanup(PathBuf::from(dir)));

            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(app_log))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Runs every hour to drop expired log files
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;
        let today = chrono::Local::now().date_naive();
        if let Err(e) = cleanup_old_logs(&log_dir, today) {
            tracing::warn!(error = %e, "Log cleanup failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(
            default_filter("debug"),
            "seatplan_server=debug,tower_http=info"
        );
    }

    #[test]
    fn test_cleanup_removes_only_expired_files() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();
        fs::write(app.join("app.2026-01-01"), "old").unwrap();
        fs::write(app.join("app.2026-01-20"), "recent").unwrap();
        fs::write(app.join("notes.txt"), "keep").unwrap();

        let today = chrono::NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
        let removed = cleanup_old_logs(dir.path(), today).unwrap();

        assert_eq!(removed, 1);
        assert!(!app.join("app.2026-01-01").exists());
        assert!(app.join("app.2026-01-20").exists());
        assert!(app.join("notes.txt").exists());
    }

    #[test]
    fn test_cleanup_without_directory() {
        let dir = tempfile::tempdir().unwrap();
        let today = chrono::NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
        assert_eq!(cleanup_old_logs(dir.path(), today).unwrap(), 0);
    }
}
