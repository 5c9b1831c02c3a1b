// Cache manager - decides how each intercepted operation uses the cache
// Author: kelexine (https://github.com/kelexine)

use crate::cache::models::CacheConfig;
use crate::codec;
use crate::directive::{composite_key, split_directive, CacheDirective};
use crate::error::CacheError;
use crate::events::{CacheObserver, NoopObserver, ReadOutcome, WriteOutcome};
use crate::metrics;
use crate::operations::{Operation, OperationKind};
use crate::store::KeyValueStore;
use crate::utils::logging::short_key;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache-aside decision engine.
///
/// Holds no per-call state: every call is classified, matched against its
/// directive and resolved against the store independently. Store failures
/// never fail a call; query failures always propagate unchanged.
pub struct CacheManager<S: ?Sized, O = NoopObserver> {
    config: CacheConfig,
    store: Arc<S>,
    observer: O,
}

impl<S: KeyValueStore + ?Sized> CacheManager<S> {
    /// Create a new cache manager without instrumentation
    pub fn new(config: CacheConfig, store: Arc<S>) -> Self {
        Self {
            config,
            store,
            observer: NoopObserver,
        }
    }
}

impl<S, O> CacheManager<S, O>
where
    S: KeyValueStore + ?Sized,
    O: CacheObserver,
{
    /// Replace the observer notified of cache interactions
    pub fn with_observer<P: CacheObserver>(self, observer: P) -> CacheManager<S, P> {
        CacheManager {
            config: self.config,
            store: self.store,
            observer,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Run `executor` for `operation` on `model`, serving, storing or
    /// evicting its result according to `directive`.
    ///
    /// Without a directive (or with caching disabled) the executor runs and
    /// nothing else happens. A directive on an unclassified operation is
    /// ignored. A directive that does not fit the operation is rejected
    /// before the executor runs.
    pub async fn handle<T, E, F, Fut>(
        &self,
        model: &str,
        operation: &str,
        directive: Option<&CacheDirective>,
        executor: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(directive) = directive.filter(|_| self.config.enabled) else {
            return executor().await;
        };

        let Some(op) = Operation::from_name(operation) else {
            warn!(
                "Ignoring cache directive on uncached operation {}.{} (key: {})",
                model,
                operation,
                short_key(&directive.key)
            );
            return executor().await;
        };

        let kind = op.kind();
        directive.validate_for(kind)?;

        let key = composite_key(model, &directive.key);
        let ttl = directive.ttl_or(self.config.default_ttl());
        let profiler = self.observer.start(model, op);

        if kind.is_write() {
            self.write_through(kind, directive.refreshes(), &key, ttl, profiler, executor)
                .await
        } else {
            self.read_through(&key, ttl, profiler, executor).await
        }
    }

    /// Like [`CacheManager::handle`], for hosts that pass one merged argument
    /// object. The `cache` field is split off and validated; `executor`
    /// receives the remaining domain arguments.
    pub async fn handle_args<T, E, F, Fut>(
        &self,
        model: &str,
        operation: &str,
        args: Value,
        executor: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let (directive, query_args) = split_directive(args)?;
        self.handle(model, operation, directive.as_ref(), move || executor(query_args))
            .await
    }

    async fn read_through<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        profiler: O::Profiler,
        executor: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.lookup::<T>(key).await {
            debug!("Cache hit: {}", short_key(key));
            self.observer.read_end(profiler, ReadOutcome::Hit);
            return Ok(cached);
        }

        debug!("Cache miss: {}", short_key(key));
        let result = match executor().await {
            Ok(result) => result,
            Err(e) => {
                self.observer.abort(profiler);
                return Err(e);
            }
        };

        self.store_result(key, &result, ttl).await;
        self.observer.read_end(profiler, ReadOutcome::Miss);
        Ok(result)
    }

    async fn write_through<T, E, F, Fut>(
        &self,
        kind: OperationKind,
        refresh: bool,
        key: &str,
        ttl: Duration,
        profiler: O::Profiler,
        executor: F,
    ) -> Result<T, E>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        // The write must land before the cache follows it
        let result = match executor().await {
            Ok(result) => result,
            Err(e) => {
                self.observer.abort(profiler);
                return Err(e);
            }
        };

        let outcome = match (kind, refresh) {
            (OperationKind::Create, _) => WriteOutcome::Create,
            (OperationKind::Update, true) => WriteOutcome::Update,
            _ => WriteOutcome::Evict,
        };

        match outcome {
            WriteOutcome::Evict => self.evict(key).await,
            WriteOutcome::Create | WriteOutcome::Update => {
                self.store_result(key, &result, ttl).await
            }
        }

        debug!("Cache {} after {}: {}", outcome, kind, short_key(key));
        self.observer.write_end(profiler, outcome);
        Ok(result)
    }

    /// Fetch and decode a stored result. Any failure reads as a miss.
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for {}, querying instead: {}", short_key(key), e);
                metrics::record_store_error("get");
                return None;
            }
        };

        match codec::decode(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding undecodable entry {}: {}", short_key(key), e);
                metrics::record_store_error("decode");
                None
            }
        }
    }

    async fn store_result<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let bytes = match codec::encode(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot encode result for {}: {}", short_key(key), e);
                metrics::record_store_error("encode");
                return;
            }
        };

        if let Err(e) = self.store.set(key, bytes, ttl).await {
            warn!("Cache write failed for {}: {}", short_key(key), e);
            metrics::record_store_error("set");
        }
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            warn!("Cache eviction failed for {}: {}", short_key(key), e);
            metrics::record_store_error("delete");
        }
    }
}
