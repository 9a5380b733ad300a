//! Trait definitions for the storage module.

use async_trait::async_trait;

use super::error::StorageError;

/// Stores content somewhere new and returns where it ended up.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the name of this storage implementation.
    fn name(&self) -> &str;

    /// Stores `content` and returns its new location.
    async fn store(&self, content: &[u8]) -> Result<String, StorageError>;
}
