//! Trait definitions for the retriever module.

use async_trait::async_trait;

use super::error::RetrieverError;

/// Fetches the content behind a URL.
///
/// Implementors provide the single-item primitive; batching is done by
/// [`retrieve_batch`](super::retrieve_batch).
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Returns the name of this retriever implementation.
    fn name(&self) -> &str;

    /// Retrieves the content at `url`.
    async fn retrieve(&self, url: &str) -> Result<Vec<u8>, RetrieverError>;
}
