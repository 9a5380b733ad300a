//! Testing utilities and mock implementations.
//!
//! The mocks double as the `stub` backends selectable in configuration, so
//! the whole pipeline can run locally without network access. Built through
//! `stub()` they keep no per-call history.
//!
//! # Example
//!
//! ```rust,ignore
//! use relocator_core::testing::{MockRetriever, MockStorage};
//!
//! let retriever = MockRetriever::new();
//! let storage = MockStorage::new();
//!
//! // Configure mock responses
//! retriever.fail_url("http://bad.example/a.png").await;
//! storage.set_fail(true).await;
//! ```

mod mock_retriever;
mod mock_storage;

pub use mock_retriever::MockRetriever;
pub use mock_storage::MockStorage;

use std::time::Duration;

/// Simulated latency of each `stub` backend call.
pub const STUB_DELAY: Duration = Duration::from_secs(1);
