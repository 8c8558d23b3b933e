//! Diagnostic logging to disk.
//!
//! The terminal is owned by the UI, so when enabled, `tracing` output goes to
//! `eventdeck_<date>.log` in the configured log directory (default:
//! `~/.local/share/eventdeck/logs/`).

use crate::config::{expand_home, LoggingConfig};
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Path of today's log file for the given config.
pub fn log_file_path(config: &LoggingConfig) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d");
    expand_home(&config.log_dir).join(format!("eventdeck_{}.log", date))
}

/// Install the global subscriber. Returns the log path, or `None` when
/// logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }

    let path = log_file_path(config);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_installs_nothing() {
        let cfg = LoggingConfig::default();
        assert!(init(&cfg).unwrap().is_none());
    }

    #[test]
    fn test_log_file_name() {
        let cfg = LoggingConfig {
            enabled: true,
            log_dir: "/tmp/eventdeck-logs".into(),
            level: "debug".into(),
        };
        let path = log_file_path(&cfg);
        assert!(path.starts_with("/tmp/eventdeck-logs"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("eventdeck_"));
        assert!(name.ends_with(".log"));
    }
}
