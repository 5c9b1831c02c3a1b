// Error types for query-cache
// Author: kelexine (https://github.com/kelexine)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    /// The caller attached a cache directive that cannot apply to this call.
    #[error("Invalid cache directive: {0}")]
    InvalidDirective(String),

    #[error("Key-value store error: {0}")]
    Store(String),

    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    /// Failure of the underlying query, for hosts whose executors report
    /// errors as `CacheError`.
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Whether this error comes from the cache layer itself rather than the
    /// query it wraps.
    pub fn is_cache_failure(&self) -> bool {
        !matches!(self, CacheError::Query(_))
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
