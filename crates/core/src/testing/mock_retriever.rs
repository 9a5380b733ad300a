//! Mock retriever for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::retriever::{Retriever, RetrieverError};

/// Mock implementation of the Retriever trait.
///
/// By default every URL retrieves as its own bytes, optionally followed by a
/// suffix. Provides controllable behavior for testing:
/// - Per-URL content overrides
/// - Per-URL failures and panics
/// - Simulated latency
/// - Recorded calls for assertions
///
/// Clones share state, so a clone handed to a relocator can still be
/// configured and inspected from the test.
#[derive(Debug, Clone, Default)]
pub struct MockRetriever {
    suffix: String,
    /// Recorded URLs, in call order. Left empty when recording is off.
    calls: Arc<RwLock<Vec<String>>>,
    skip_recording: bool,
    retrieved: Arc<AtomicUsize>,
    overrides: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    panicking: Arc<RwLock<HashSet<String>>>,
    delay: Arc<RwLock<Duration>>,
}

impl MockRetriever {
    /// Create a new mock retriever.
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-recording retriever with a one second delay, used as the `stub`
    /// backend of long-running servers.
    pub fn stub() -> Self {
        Self::new()
            .without_recording()
            .with_delay(super::STUB_DELAY)
    }

    /// Stop keeping URLs; only the call count is tracked.
    pub fn without_recording(mut self) -> Self {
        self.skip_recording = true;
        self
    }

    /// Start with a simulated retrieval duration.
    pub fn with_delay(self, delay: Duration) -> Self {
        Self {
            delay: Arc::new(RwLock::new(delay)),
            ..self
        }
    }

    /// Append `suffix` to the content of every URL without an override.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Return `content` for `url` instead of the echoed URL.
    pub async fn set_content(&self, url: impl Into<String>, content: Vec<u8>) {
        self.overrides.write().await.insert(url.into(), content);
    }

    /// Make retrieval of `url` fail.
    pub async fn fail_url(&self, url: impl Into<String>) {
        self.failing.write().await.insert(url.into());
    }

    /// Make retrieval of `url` panic.
    pub async fn panic_on(&self, url: impl Into<String>) {
        self.panicking.write().await.insert(url.into());
    }

    /// Set the simulated retrieval duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Get all recorded URLs.
    pub async fn recorded_urls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    /// Get the number of retrievals performed.
    pub async fn retrieve_count(&self) -> usize {
        self.retrieved.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    fn name(&self) -> &str {
        "mock"
    }

    async fn retrieve(&self, url: &str) -> Result<Vec<u8>, RetrieverError> {
        self.retrieved.fetch_add(1, Ordering::SeqCst);
        if !self.skip_recording {
            self.calls.write().await.push(url.to_string());
        }

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.panicking.read().await.contains(url) {
            panic!("mock retriever panic for {}", url);
        }

        if self.failing.read().await.contains(url) {
            return Err(RetrieverError::HttpStatus {
                url: url.to_string(),
                status: 404,
            });
        }

        if let Some(content) = self.overrides.read().await.get(url) {
            return Ok(content.clone());
        }

        Ok(format!("{}{}", url, self.suffix).into_bytes())
    }
}
