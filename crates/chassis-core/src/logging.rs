use std::path::PathBuf;

use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Return the log directory path.
///
/// Precedence: `CHASSIS_LOG_DIR` env var > platform default.
/// macOS: `~/Library/Logs/chassis/`
/// Linux: `$XDG_DATA_HOME/chassis/logs/` or `~/.local/share/chassis/logs/`
pub fn log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHASSIS_LOG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home.join("Library").join("Logs").join("chassis");
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        if let Some(data) = dirs::data_dir() {
            return data.join("chassis").join("logs");
        }
    }

    PathBuf::from("logs")
}

const LOG_RETENTION_DAYS: u64 = 7;

/// Remove chassis log files older than `max_age_days` from the given
/// directory.
///
/// Only deletes files whose name starts with `chassis.log` (the prefix used
/// by the daily rolling appender) to avoid accidentally removing unrelated
/// files if the log directory is shared.
fn cleanup_old_logs(log_path: &std::path::Path, max_age_days: u64) {
    let cutoff =
        std::time::SystemTime::now() - std::time::Duration::from_secs(max_age_days * 86400);
    if let Ok(entries) = std::fs::read_dir(log_path) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with("chassis.log") {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                if let Ok(modified) = meta.modified() {
                    if modified < cutoff {
                        let _ = std::fs::remove_file(entry.path());
                    }
                }
            }
        }
    }
}

/// Initialize the logging subsystem.
///
/// Filter controlled by `CHASSIS_LOG` or `RUST_LOG` (default: `info`).
/// Output: plain text on stderr plus daily rotation in `log_dir()`,
/// 7-day retention.
pub fn init() {
    let filter = EnvFilter::try_from_env("CHASSIS_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_path = log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_path) {
        eprintln!(
            "warning: failed to create log directory {:?}: {}",
            log_path, e
        );
    }

    cleanup_old_logs(&log_path, LOG_RETENTION_DAYS);

    let file_appender = rolling::daily(&log_path, "chassis.log");
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    // Serialize env-mutating tests to avoid data races.
    static ENV_LOCK: StdMutex<()> = StdMutex::new(());

    #[test]
    fn log_dir_respects_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var("CHASSIS_LOG_DIR").ok();

        unsafe { std::env::set_var("CHASSIS_LOG_DIR", "/tmp/chassis-test-logs") };
        assert_eq!(log_dir(), PathBuf::from("/tmp/chassis-test-logs"));

        match original {
            Some(v) => unsafe { std::env::set_var("CHASSIS_LOG_DIR", v) },
            None => unsafe { std::env::remove_var("CHASSIS_LOG_DIR") },
        }
    }

    #[test]
    fn log_dir_default_has_chassis_component() {
        let _guard = ENV_LOCK.lock().unwrap();
        let original = std::env::var("CHASSIS_LOG_DIR").ok();

        unsafe { std::env::remove_var("CHASSIS_LOG_DIR") };
        let dir = log_dir();
        assert!(dir.components().any(|c| c.as_os_str() == "chassis"));

        if let Some(v) = original {
            unsafe { std::env::set_var("CHASSIS_LOG_DIR", v) };
        }
    }

    #[test]
    fn cleanup_old_logs_removes_stale_files() {
        let tmp = std::env::temp_dir().join("chassis-test-cleanup");
        let _ = std::fs::create_dir_all(&tmp);

        let log_a = tmp.join("chassis.log.2025-01-01");
        let log_b = tmp.join("chassis.log.2025-01-02");
        let other = tmp.join("other.txt");
        std::fs::write(&log_a, "a").unwrap();
        std::fs::write(&log_b, "b").unwrap();
        std::fs::write(&other, "c").unwrap();

        // max_age_days=0 means cutoff is "now", so all matching files get cleaned
        cleanup_old_logs(&tmp, 0);
        assert!(!log_a.exists(), "chassis log file should be deleted");
        assert!(!log_b.exists(), "chassis log file should be deleted");
        assert!(other.exists(), "non-chassis file should be preserved");

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
