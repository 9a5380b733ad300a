use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::debug;

use super::{Storage, StorageError};
use crate::batch::{settle, BatchReport, Stage};

/// Stores every content item concurrently.
///
/// `on_each` is called exactly once per item, in completion order, with the
/// original content and its new location or `None`. Errors, empty locations
/// and panics inside the storage all become `None`.
pub async fn store_batch<S, F>(storage: &S, contents: Vec<Vec<u8>>, mut on_each: F) -> BatchReport
where
    S: Storage + ?Sized,
    F: FnMut(Vec<u8>, Option<String>),
{
    debug!(storage = storage.name(), count = contents.len(), "Starting storage batch");

    let mut in_flight: FuturesUnordered<_> = contents
        .into_iter()
        .map(|content| async move {
            let started = Instant::now();
            let outcome = AssertUnwindSafe(storage.store(&content))
                .catch_unwind()
                .await
                .map(|result| {
                    result.and_then(|location| {
                        if location.is_empty() {
                            Err(StorageError::InvalidResponse(
                                "empty location".to_string(),
                            ))
                        } else {
                            Ok(location)
                        }
                    })
                });
            (content, outcome, started.elapsed())
        })
        .collect();

    let mut report = BatchReport::default();
    while let Some((content, outcome, elapsed)) = in_flight.next().await {
        let label = format!("{} bytes", content.len());
        let location = settle(Stage::Store, &label, outcome, elapsed);
        report.record(&location);
        on_each(content, location);
    }

    debug!(
        storage = storage.name(),
        total = report.total,
        succeeded = report.succeeded,
        failed = report.failed,
        "Storage batch finished"
    );
    report
}
