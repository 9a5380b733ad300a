//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the relocator server:
//! - HTTP request metrics (latency, counts), labelled by route template
//! - Job activity (collected dynamically)
//! - Core relocation metrics (registered from `relocator_core::metrics`)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "relocator_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("relocator_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "relocator_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Job Metrics (collected dynamically)
// =============================================================================

/// Jobs known to the registry.
pub static JOBS_TOTAL: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("relocator_jobs", "Number of jobs in the registry").unwrap()
});

/// Jobs with work still running.
pub static JOBS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "relocator_jobs_active",
        "Number of jobs with retrievals or stores still running",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Jobs
    registry.register(Box::new(JOBS_TOTAL.clone())).unwrap();
    registry.register(Box::new(JOBS_ACTIVE.clone())).unwrap();

    // Core metrics (jobs, commits, batch stages)
    for metric in relocator_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the job gauges reflect the registry.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let relocator = state.relocator();
    JOBS_TOTAL.set(relocator.job_count() as i64);
    JOBS_ACTIVE.set(relocator.active_jobs() as i64);
}

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_includes_core_metrics() {
        relocator_core::metrics::JOBS_CREATED.inc();
        let output = encode_metrics();
        assert!(output.contains("relocator_jobs_created_total"));
    }
}
