// query-cache - Cache-aside layer for data-layer query results
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod codec;
pub mod config;
pub mod directive;
pub mod error;
pub mod events;
pub mod metrics;
pub mod operations;
pub mod store;
pub mod utils;

pub use cache::{CacheConfig, CacheManager};
pub use directive::CacheDirective;
pub use error::{CacheError, Result};
pub use events::{CacheObserver, MetricsObserver, NoopObserver, ReadOutcome, WriteOutcome};
pub use operations::{classify, Operation, OperationKind};
pub use store::{KeyValueStore, MemoryStore};
