// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    CLEANUP_FILES,
    EPOCH_ADVANCES,
    IMAGE_REQUESTS,
    PIPELINE_RUNS,
    SESSIONS_ACTIVE,
    SESSIONS_CREATED,
};

/// Helper to record an epoch advance
pub fn record_epoch_advance(reason: &str) {
    EPOCH_ADVANCES.with_label_values(&[reason]).inc();
}

/// Helper to record cleanup results
pub fn record_cleanup(removed: usize, failed: usize) {
    if removed > 0 {
        CLEANUP_FILES
            .with_label_values(&["removed"])
            .inc_by(removed as f64);
    }
    if failed > 0 {
        CLEANUP_FILES
            .with_label_values(&["failed"])
            .inc_by(failed as f64);
    }
}

pub fn record_image_served() {
    IMAGE_REQUESTS.with_label_values(&["served"]).inc();
}

pub fn record_image_missing() {
    IMAGE_REQUESTS.with_label_values(&["missing"]).inc();
}

/// Helper to record session lifecycle
pub fn record_session_created(cause: &str) {
    SESSIONS_CREATED.with_label_values(&[cause]).inc();
}

pub fn update_active_sessions(count: usize) {
    SESSIONS_ACTIVE.set(count as f64);
}

pub fn record_pipeline_run(outcome: &str) {
    PIPELINE_RUNS.with_label_values(&[outcome]).inc();
}
