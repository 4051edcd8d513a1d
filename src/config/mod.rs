//! Configuration module for the Jiskefet client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::RefreshSchedule;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST API, always ending with a slash
    pub api_url: String,
    /// Path to the JSON file backing client storage
    pub storage_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Timeout applied to every API request
    pub request_timeout: Duration,
    /// When the auth settings are refreshed
    pub settings_refresh: RefreshSchedule,
    /// Session token written to storage on startup, if given
    pub session_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_url = normalize_api_url(
            &env::var("JISKEFET_API_URL").unwrap_or_else(|_| "http://localhost:3000/".to_string()),
        );

        let storage_path = env::var("JISKEFET_STORAGE_PATH")
            .unwrap_or_else(|_| "./data/session.json".to_string())
            .into();

        let log_level = env::var("JISKEFET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("JISKEFET_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let request_timeout = env::var("JISKEFET_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(10));

        let settings_refresh = env::var("JISKEFET_SETTINGS_REFRESH_AT")
            .ok()
            .and_then(|v| RefreshSchedule::parse_daily(&v))
            .unwrap_or_default();

        let session_token = env::var("JISKEFET_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        Self {
            api_url,
            storage_path,
            log_level,
            log_format,
            request_timeout,
            settings_refresh,
            session_token,
        }
    }
}

/// Endpoints are appended directly to the base URL, so it must end with `/`.
pub fn normalize_api_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}
