//! Instrumentation hooks for cached operations.
//!
//! An observer sees a two-phase protocol for every call that carries a cache
//! directive: [`CacheObserver::start`] hands out a profiler token, and that
//! token is moved into exactly one end notification. Pass-through calls are
//! never observed.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::metrics;
use crate::operations::{Operation, OperationKind};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// How a read-kind operation was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Hit,
    Miss,
}

/// What a write-kind operation did to the cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Create,
    Update,
    Evict,
}

impl ReadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadOutcome::Hit => "hit",
            ReadOutcome::Miss => "miss",
        }
    }
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Create => "create",
            WriteOutcome::Update => "update",
            WriteOutcome::Evict => "evict",
        }
    }
}

impl fmt::Display for ReadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of cache interaction events.
pub trait CacheObserver: Send + Sync {
    /// Opaque value carried from `start` to the matching end call.
    type Profiler: Send;

    /// Called once before the store or the query is touched.
    fn start(&self, model: &str, operation: Operation) -> Self::Profiler;

    /// Called once when a read-kind operation has its result.
    fn read_end(&self, profiler: Self::Profiler, outcome: ReadOutcome);

    /// Called once when a write-kind operation has updated the cache.
    fn write_end(&self, profiler: Self::Profiler, outcome: WriteOutcome);

    /// Called instead of an end notification when the query itself failed.
    fn abort(&self, profiler: Self::Profiler) {
        drop(profiler);
    }
}

impl<O: CacheObserver + ?Sized> CacheObserver for Arc<O> {
    type Profiler = O::Profiler;

    fn start(&self, model: &str, operation: Operation) -> Self::Profiler {
        (**self).start(model, operation)
    }

    fn read_end(&self, profiler: Self::Profiler, outcome: ReadOutcome) {
        (**self).read_end(profiler, outcome)
    }

    fn write_end(&self, profiler: Self::Profiler, outcome: WriteOutcome) {
        (**self).write_end(profiler, outcome)
    }

    fn abort(&self, profiler: Self::Profiler) {
        (**self).abort(profiler)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CacheObserver for NoopObserver {
    type Profiler = ();

    fn start(&self, _model: &str, _operation: Operation) {}

    fn read_end(&self, _profiler: (), _outcome: ReadOutcome) {}

    fn write_end(&self, _profiler: (), _outcome: WriteOutcome) {}
}

/// Observer that feeds the Prometheus collectors in [`crate::metrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

/// Profiler token of [`MetricsObserver`].
#[derive(Debug)]
pub struct Timing {
    kind: OperationKind,
    started: Instant,
}

impl CacheObserver for MetricsObserver {
    type Profiler = Timing;

    fn start(&self, _model: &str, operation: Operation) -> Timing {
        Timing {
            kind: operation.kind(),
            started: Instant::now(),
        }
    }

    fn read_end(&self, profiler: Timing, outcome: ReadOutcome) {
        let elapsed = profiler.started.elapsed().as_secs_f64();
        metrics::record_operation(profiler.kind, outcome.as_str(), elapsed);
    }

    fn write_end(&self, profiler: Timing, outcome: WriteOutcome) {
        let elapsed = profiler.started.elapsed().as_secs_f64();
        metrics::record_operation(profiler.kind, outcome.as_str(), elapsed);
    }

    fn abort(&self, profiler: Timing) {
        let elapsed = profiler.started.elapsed().as_secs_f64();
        metrics::record_operation(profiler.kind, "aborted", elapsed);
    }
}
