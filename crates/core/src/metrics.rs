//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Job lifecycle (jobs created, relocations started and committed)
//! - Batch stages (per-item retrieve/store outcomes and durations)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Jobs
// =============================================================================

/// Jobs started.
pub static JOBS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("relocator_jobs_created_total", "Total relocation jobs created").unwrap()
});

/// Distinct source URLs accepted across all jobs.
pub static RELOCATIONS_STARTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "relocator_relocations_started_total",
        "Total relocations started",
    )
    .unwrap()
});

/// Outcomes committed by the relocator.
pub static RELOCATIONS_COMMITTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "relocator_relocations_committed_total",
            "Total relocation outcomes committed",
        ),
        &["result"], // "stored", "failed", "error"
    )
    .unwrap()
});

/// Commits that hit an already committed relocation.
pub static RECOMMITS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "relocator_recommits_total",
            "Commits for relocations that already had an outcome",
        ),
        &["action"], // "overwritten", "rejected"
    )
    .unwrap()
});

// =============================================================================
// Batches
// =============================================================================

/// Batch items by stage and result.
pub static BATCH_ITEMS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("relocator_batch_items_total", "Total batch items processed"),
        &["stage", "result"], // stage: "retrieve", "store"; result: "success", "failure", "panic"
    )
    .unwrap()
});

/// Duration of a single retrieve or store call.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "relocator_stage_duration_seconds",
            "Duration of a single retrieve or store call",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["stage"],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Jobs
        Box::new(JOBS_CREATED.clone()),
        Box::new(RELOCATIONS_STARTED.clone()),
        Box::new(RELOCATIONS_COMMITTED.clone()),
        Box::new(RECOMMITS.clone()),
        // Batches
        Box::new(BATCH_ITEMS.clone()),
        Box::new(STAGE_DURATION.clone()),
    ]
}
