// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_gauge_with_registry, CounterVec, Encoder, Gauge,
    Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // CACHE EPOCH METRICS
    // ============================================================================

    /// Cache epoch advances, by invalidation reason
    pub static ref EPOCH_ADVANCES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cache_epoch_advances_total", "Cache epoch advances"),
        &["reason"], // new_search, clear_cache
        REGISTRY
    ).unwrap();

    // ============================================================================
    // CLEANUP METRICS
    // ============================================================================

    /// Result files touched by cleanup, by outcome
    pub static ref CLEANUP_FILES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cleanup_files_total", "Result files processed by cleanup"),
        &["outcome"], // removed, failed
        REGISTRY
    ).unwrap();

    // ============================================================================
    // IMAGE SERVING METRICS
    // ============================================================================

    /// Image requests, by outcome
    pub static ref IMAGE_REQUESTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("image_requests_total", "Image requests"),
        &["outcome"], // served, missing
        REGISTRY
    ).unwrap();

    // ============================================================================
    // SESSION METRICS
    // ============================================================================

    /// Sessions created (first visit or expired cookie)
    pub static ref SESSIONS_CREATED: CounterVec = register_counter_vec_with_registry!(
        Opts::new("sessions_created_total", "Sessions created"),
        &["cause"], // no_cookie, unknown_session
        REGISTRY
    ).unwrap();

    /// Sessions currently held in memory
    pub static ref SESSIONS_ACTIVE: Gauge = register_gauge_with_registry!(
        Opts::new("sessions_active", "Sessions currently held in memory"),
        REGISTRY
    ).unwrap();

    // ============================================================================
    // PIPELINE METRICS
    // ============================================================================

    /// Detection pipeline runs, by outcome
    pub static ref PIPELINE_RUNS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("pipeline_runs_total", "Detection pipeline runs"),
        &["outcome"], // success, nonzero_exit, error, timeout
        REGISTRY
    ).unwrap();
}

/// Gather all metrics in Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
