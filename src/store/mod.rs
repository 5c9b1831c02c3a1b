//! Key-value store adapters.
//!
//! The cache engine only needs three primitives from a store: read bytes,
//! write bytes with an expiry, and delete. Entry lifetime is the store's
//! business; the engine never scans or bulk-evicts.
//!
//! # Backends
//!
//! - `memory`: [`MemoryStore`], an in-process map with lazy TTL expiry.
//! - `redis`: `RedisStore`, behind the `redis` cargo feature.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod memory;
#[cfg(feature = "redis")]
mod redis_store;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::directive::MAX_TTL_SECONDS;
#[cfg(not(feature = "redis"))]
use crate::error::CacheError;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Byte-oriented key-value store with per-entry expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the bytes stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Remove the entry under `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }
}

/// Expiry every backend actually applies: whole seconds between one second
/// and [`MAX_TTL_SECONDS`].
pub fn effective_ttl(ttl: Duration) -> Duration {
    Duration::from_secs(ttl.as_secs().clamp(1, MAX_TTL_SECONDS))
}

/// Build the store selected by configuration.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory key-value store");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "redis")]
        StoreBackend::Redis => {
            info!("Connecting to Redis key-value store");
            Ok(Arc::new(RedisStore::connect(&config.redis_url).await?))
        }
        #[cfg(not(feature = "redis"))]
        StoreBackend::Redis => Err(CacheError::Config(
            "redis backend requires the `redis` feature".to_string(),
        )),
    }
}
