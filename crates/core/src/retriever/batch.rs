use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::debug;

use super::{Retriever, RetrieverError};
use crate::batch::{settle, BatchReport, Stage};

/// Retrieves every URL concurrently.
///
/// `on_each` is called exactly once per URL, in completion order, with the
/// content or `None`. Errors, empty bodies and panics inside the retriever
/// all become `None`. Returns once every callback has run.
pub async fn retrieve_batch<R, F>(retriever: &R, urls: Vec<String>, mut on_each: F) -> BatchReport
where
    R: Retriever + ?Sized,
    F: FnMut(String, Option<Vec<u8>>),
{
    debug!(retriever = retriever.name(), count = urls.len(), "Starting retrieval batch");

    let mut in_flight: FuturesUnordered<_> = urls
        .into_iter()
        .map(|url| async move {
            let started = Instant::now();
            let outcome = AssertUnwindSafe(retriever.retrieve(&url))
                .catch_unwind()
                .await
                .map(|result| {
                    result.and_then(|content| {
                        if content.is_empty() {
                            Err(RetrieverError::EmptyBody { url: url.clone() })
                        } else {
                            Ok(content)
                        }
                    })
                });
            (url, outcome, started.elapsed())
        })
        .collect();

    let mut report = BatchReport::default();
    while let Some((url, outcome, elapsed)) = in_flight.next().await {
        let content = settle(Stage::Retrieve, &url, outcome, elapsed);
        report.record(&content);
        on_each(url, content);
    }

    debug!(
        retriever = retriever.name(),
        total = report.total,
        succeeded = report.succeeded,
        failed = report.failed,
        "Retrieval batch finished"
    );
    report
}
