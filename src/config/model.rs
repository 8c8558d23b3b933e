//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// UI appearance and behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Long date format used on detail and ticket views.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_short_date_format")]
    pub short_date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_events_per_page")]
    pub events_per_page: usize,
    /// How long a notification stays on screen.
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            short_date_format: default_short_date_format(),
            time_format: default_time_format(),
            events_per_page: default_events_per_page(),
            toast_secs: default_toast_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

/// Artificial delays applied by the mock service, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_list_latency")]
    pub list_latency_ms: u64,
    #[serde(default = "default_fetch_latency")]
    pub fetch_latency_ms: u64,
    #[serde(default = "default_mutate_latency")]
    pub mutate_latency_ms: u64,
    #[serde(default = "default_mutate_latency")]
    pub auth_latency_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            list_latency_ms: default_list_latency(),
            fetch_latency_ms: default_fetch_latency(),
            mutate_latency_ms: default_mutate_latency(),
            auth_latency_ms: default_mutate_latency(),
        }
    }
}

/// Where the signed-in session is remembered between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_true")]
    pub remember: bool,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            remember: true,
            path: None,
        }
    }
}

/// Diagnostic log settings. The terminal belongs to the UI, so logs go to a
/// file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_date_format() -> String {
    "%A, %B %-d, %Y".to_string()
}
fn default_short_date_format() -> String {
    "%b %-d, %Y".to_string()
}
fn default_time_format() -> String {
    "%-I:%M %p".to_string()
}
fn default_events_per_page() -> usize {
    12
}
fn default_toast_secs() -> u64 {
    4
}
fn default_tick_ms() -> u64 {
    100
}
fn default_list_latency() -> u64 {
    600
}
fn default_fetch_latency() -> u64 {
    500
}
fn default_mutate_latency() -> u64 {
    800
}
fn default_log_dir() -> String {
    "~/.local/share/eventdeck/logs".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
