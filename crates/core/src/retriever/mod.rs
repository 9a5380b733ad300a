//! Content retrieval.
//!
//! A [`Retriever`] fetches the content behind one URL.
//! [`retrieve_batch`] fans a list of URLs out over any retriever and reports
//! each outcome through a callback as soon as it is known.

mod batch;
mod error;
mod http;
mod traits;

pub use batch::retrieve_batch;
pub use error::RetrieverError;
pub use http::HttpRetriever;
pub use traits::Retriever;

use crate::config::{RetrieverBackend, RetrieverConfig};
use crate::testing::MockRetriever;

/// Factory function to create a retriever from config
pub fn create_retriever(config: &RetrieverConfig) -> Result<Box<dyn Retriever>, RetrieverError> {
    match config.backend {
        RetrieverBackend::Http => Ok(Box::new(HttpRetriever::new(config.clone())?)),
        RetrieverBackend::Stub => Ok(Box::new(MockRetriever::stub())),
    }
}
