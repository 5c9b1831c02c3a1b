// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{CacheError, Result};
use config::{Config, Environment};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "QUERY_CACHE";

impl AppConfig {
    /// Load configuration with precedence:
    /// 1. Environment variables (highest), e.g. `QUERY_CACHE_CACHE__DEFAULT_TTL_SECONDS`
    /// 2. Defaults (lowest)
    pub fn load() -> Result<Self> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    /// Same as [`AppConfig::load`] with a custom environment prefix.
    pub fn load_with_prefix(prefix: &str) -> Result<Self> {
        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Nested keys are separated by a double underscore
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
            )
            .build()
            .map_err(|e| CacheError::Config(e.to_string()))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| CacheError::Config(e.to_string()))?;
        app.cache.validate()?;

        Ok(app)
    }
}
