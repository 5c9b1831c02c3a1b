// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REGISTRY,
    CACHE_OPERATIONS,
    CACHE_OPERATION_DURATION,
    STORE_ERRORS,
};

use crate::operations::OperationKind;

/// Helper to record a finished cached operation
pub fn record_operation(kind: OperationKind, outcome: &str, duration_secs: f64) {
    CACHE_OPERATIONS
        .with_label_values(&[kind.as_str(), outcome])
        .inc();

    CACHE_OPERATION_DURATION
        .with_label_values(&[outcome])
        .observe(duration_secs);
}

/// Helper to record a store failure the engine absorbed
pub fn record_store_error(op: &str) {
    STORE_ERRORS.with_label_values(&[op]).inc();
}
