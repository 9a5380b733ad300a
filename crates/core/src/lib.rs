pub mod batch;
pub mod config;
pub mod metrics;
pub mod relocation;
pub mod relocator;
pub mod retriever;
pub mod storage;
pub mod testing;

pub use batch::{BatchReport, Stage};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ImgurConfig,
    RelocatorConfig, RetrieverBackend, RetrieverConfig, SanitizedConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
pub use relocation::{
    CommitPolicy, JobId, JobRecord, JobRegistry, JobSnapshot, JobStatus, JobStatusReport,
    RelocationError, RelocationRecord, RelocationState, UploadBreakdown, UploadedList,
};
pub use relocator::Relocator;
pub use retriever::{create_retriever, retrieve_batch, HttpRetriever, Retriever, RetrieverError};
pub use storage::{create_storage, store_batch, ImgurStorage, Storage, StorageError};
