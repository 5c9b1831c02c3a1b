//! Cache engine configuration.

// Author: kelexine (https://github.com/kelexine)

use crate::directive::MAX_TTL_SECONDS;
use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the cache decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether directives are honoured. When off, every call passes through.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Expiry applied to stored results whose directive has no `ttl`.
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Reject settings the stores cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl_seconds == 0 || self.default_ttl_seconds > MAX_TTL_SECONDS {
            return Err(CacheError::Config(format!(
                "cache.default_ttl_seconds must be between 1 and {}, got {}",
                MAX_TTL_SECONDS, self.default_ttl_seconds
            )));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// Provides default values for cache configuration.
    ///
    /// - `enabled`: true
    /// - `default_ttl_seconds`: 900 (15 minutes)
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_seconds: default_ttl_seconds(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl_seconds() -> u64 {
    60 * 15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_ttl() {
        assert!(CacheConfig::default().validate().is_ok());

        for seconds in [0, MAX_TTL_SECONDS + 1] {
            let config = CacheConfig {
                default_ttl_seconds: seconds,
                ..CacheConfig::default()
            };
            assert!(matches!(config.validate(), Err(CacheError::Config(_))));
        }
    }
}
