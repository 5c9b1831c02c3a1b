// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // CACHE DECISION METRICS
    // ============================================================================

    /// Cached operations by kind and outcome
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cache_operations_total", "Total cached operations"),
        &["kind", "outcome"], // outcome: hit, miss, create, update, evict, aborted
        REGISTRY
    ).unwrap();

    /// Time from decision start to final notification
    pub static ref CACHE_OPERATION_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("cache_operation_duration_seconds", "Cached operation duration in seconds")
            .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        &["outcome"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // STORE METRICS
    // ============================================================================

    /// Store calls that failed and were absorbed by the engine
    pub static ref STORE_ERRORS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cache_store_errors_total", "Total absorbed key-value store errors"),
        &["op"], // op: get, set, delete, encode, decode
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Vec collectors only appear once a label set has been touched
        CACHE_OPERATIONS.with_label_values(&["read", "hit"]).inc_by(0.0);
        CACHE_OPERATION_DURATION.with_label_values(&["hit"]).observe(0.0);
        STORE_ERRORS.with_label_values(&["get"]).inc_by(0.0);

        let metrics = gather_metrics();
        assert!(metrics.contains("cache_operations_total"));
        assert!(metrics.contains("cache_operation_duration_seconds"));
        assert!(metrics.contains("cache_store_errors_total"));
    }
}
