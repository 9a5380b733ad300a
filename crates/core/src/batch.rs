//! Shared plumbing for the retrieve and store batch functions.
//!
//! Each batch polls one future per item concurrently. Whatever an item
//! produces (a value, an error, or a panic) is settled here into an
//! `Option`, logged and counted, so nothing escapes the batch.

use std::any::Any;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::metrics;

/// Pipeline stage a batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieve,
    Store,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a finished batch. `succeeded + failed == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    pub(crate) fn record<T>(&mut self, outcome: &Option<T>) {
        self.total += 1;
        if outcome.is_some() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Result of one item as produced by `catch_unwind`.
pub(crate) type ItemOutcome<T, E> = Result<Result<T, E>, Box<dyn Any + Send>>;

/// Reduces an item outcome to `Some(value)` or `None`.
pub(crate) fn settle<T, E: fmt::Display>(
    stage: Stage,
    item: &str,
    outcome: ItemOutcome<T, E>,
    elapsed: Duration,
) -> Option<T> {
    metrics::STAGE_DURATION
        .with_label_values(&[stage.as_str()])
        .observe(elapsed.as_secs_f64());

    match outcome {
        Ok(Ok(value)) => {
            debug!(stage = %stage, item = %item, elapsed_ms = elapsed.as_millis() as u64, "Batch item succeeded");
            metrics::BATCH_ITEMS
                .with_label_values(&[stage.as_str(), "success"])
                .inc();
            Some(value)
        }
        Ok(Err(e)) => {
            warn!(stage = %stage, item = %item, error = %e, "Batch item failed");
            metrics::BATCH_ITEMS
                .with_label_values(&[stage.as_str(), "failure"])
                .inc();
            None
        }
        Err(panic) => {
            error!(
                stage = %stage,
                item = %item,
                panic = %panic_message(panic.as_ref()),
                "Batch item panicked"
            );
            metrics::BATCH_ITEMS
                .with_label_values(&[stage.as_str(), "panic"])
                .inc();
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
