//! Mock storage for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::storage::{Storage, StorageError};

/// Mock implementation of the Storage trait.
///
/// Stores content "at" `<content>/uploaded`. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    /// Recorded contents, in call order. Left empty when recording is off.
    calls: Arc<RwLock<Vec<Vec<u8>>>>,
    skip_recording: bool,
    stored: Arc<AtomicUsize>,
    locations: Arc<RwLock<HashMap<Vec<u8>, String>>>,
    panicking: Arc<RwLock<HashSet<Vec<u8>>>>,
    fail: Arc<RwLock<bool>>,
    delay: Arc<RwLock<Duration>>,
}

impl MockStorage {
    /// Create a new mock storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-recording storage with a one second delay, used as the `stub`
    /// backend of long-running servers.
    pub fn stub() -> Self {
        Self::new()
            .without_recording()
            .with_delay(super::STUB_DELAY)
    }

    /// Stop keeping stored contents; only the call count is tracked.
    pub fn without_recording(mut self) -> Self {
        self.skip_recording = true;
        self
    }

    /// Start with a simulated store duration.
    pub fn with_delay(self, delay: Duration) -> Self {
        Self {
            delay: Arc::new(RwLock::new(delay)),
            ..self
        }
    }

    /// Make every store fail while set.
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Return `location` when `content` is stored.
    pub async fn set_location(&self, content: &[u8], location: impl Into<String>) {
        self.locations
            .write()
            .await
            .insert(content.to_vec(), location.into());
    }

    /// Make storing `content` panic.
    pub async fn panic_on(&self, content: &[u8]) {
        self.panicking.write().await.insert(content.to_vec());
    }

    /// Set the simulated store duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Get all recorded contents.
    pub async fn recorded_contents(&self) -> Vec<Vec<u8>> {
        self.calls.read().await.clone()
    }

    /// Get the number of stores performed.
    pub async fn store_count(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MockStorage {
    fn name(&self) -> &str {
        "mock"
    }

    async fn store(&self, content: &[u8]) -> Result<String, StorageError> {
        self.stored.fetch_add(1, Ordering::SeqCst);
        if !self.skip_recording {
            self.calls.write().await.push(content.to_vec());
        }

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.panicking.read().await.contains(content) {
            panic!("mock storage panic for {} bytes", content.len());
        }

        if *self.fail.read().await {
            return Err(StorageError::Rejected {
                status: 500,
                message: "mock failure".to_string(),
            });
        }

        if let Some(location) = self.locations.read().await.get(content) {
            return Ok(location.clone());
        }

        Ok(format!("{}/uploaded", String::from_utf8_lossy(content)))
    }
}
