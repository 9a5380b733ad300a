//! Content storage.
//!
//! A [`Storage`] puts one piece of content somewhere new and returns its
//! location. [`store_batch`] fans a list of contents out over any storage.

mod batch;
mod error;
mod imgur;
mod traits;

pub use batch::store_batch;
pub use error::StorageError;
pub use imgur::ImgurStorage;
pub use traits::Storage;

use crate::config::{StorageBackend, StorageConfig};
use crate::testing::MockStorage;

/// Factory function to create a storage from config
pub fn create_storage(config: &StorageConfig) -> Result<Box<dyn Storage>, StorageError> {
    match config.backend {
        StorageBackend::Imgur => {
            let imgur = config.imgur.clone().ok_or_else(|| {
                StorageError::Configuration(
                    "storage.imgur must be set when using the imgur backend".to_string(),
                )
            })?;
            Ok(Box::new(ImgurStorage::new(imgur)?))
        }
        StorageBackend::Stub => Ok(Box::new(MockStorage::stub())),
    }
}
