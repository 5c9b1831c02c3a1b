//! Structured logging setup and log-safe key rendering.
//!
//! This module configures the `tracing` ecosystem for the application and
//! keeps caller-supplied cache keys from flooding log lines.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{CacheError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Longest key rendered verbatim in log lines.
const MAX_LOGGED_KEY_CHARS: usize = 64;

/// Initializes the global tracing subscriber.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    installed.map_err(|e| CacheError::Internal(format!("Failed to install logger: {}", e)))
}

/// Render a cache key for logging, truncating long keys.
///
/// Keys are caller-chosen and may embed whole query fingerprints; only the
/// first `MAX_LOGGED_KEY_CHARS` characters are kept, followed by the total
/// length in bytes.
pub fn short_key(key: &str) -> String {
    match key.char_indices().nth(MAX_LOGGED_KEY_CHARS) {
        Some((cut, _)) => format!("{}…({} bytes)", &key[..cut], key.len()),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_installs_once() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };

        assert!(init(&config).is_ok());
        assert!(matches!(init(&config), Err(CacheError::Internal(_))));
    }

    #[test]
    fn test_short_key_keeps_short_keys() {
        assert_eq!(short_key("User:Gabriel"), "User:Gabriel");
        assert_eq!(short_key(""), "");
    }

    #[test]
    fn test_short_key_truncates() {
        let key = format!("User:{}", "x".repeat(200));
        let rendered = short_key(&key);
        assert!(rendered.starts_with("User:xxx"));
        assert!(rendered.ends_with("(205 bytes)"));
        assert!(rendered.len() < key.len());
    }

    #[test]
    fn test_short_key_respects_char_boundaries() {
        let key = "é".repeat(100);
        let rendered = short_key(&key);
        assert!(rendered.starts_with(&"é".repeat(64)));
        assert!(rendered.ends_with("(200 bytes)"));
    }
}
