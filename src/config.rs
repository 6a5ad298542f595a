use crate::faceit::DEFAULT_API_BASE;
use std::path::PathBuf;
use std::time::Duration;

/// Process configuration read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    /// overrides the key stored in settings
    pub api_key: Option<String>,
    pub settings_path: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let http_timeout = get("FACEIT_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(15);
        Self {
            api_base: get("FACEIT_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: get("FACEIT_API_KEY").filter(|k| !k.trim().is_empty()),
            settings_path: get("FACEIT_H2H_SETTINGS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("settings.json")),
            http_timeout: Duration::from_secs(http_timeout),
        }
    }
}
