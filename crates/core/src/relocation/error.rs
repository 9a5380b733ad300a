//! Error types for the relocation module.

use thiserror::Error;

use super::JobId;

/// Errors raised by job and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelocationError {
    /// No job with this id exists in the registry.
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    /// The source URL is not a member of the job.
    #[error("Relocation not found in job {job_id}: {source_url}")]
    RelocationNotFound { job_id: JobId, source_url: String },

    /// The relocation already has an outcome and the registry rejects overwrites.
    #[error("Relocation already committed in job {job_id}: {source_url}")]
    AlreadyCommitted { job_id: JobId, source_url: String },
}

impl RelocationError {
    /// Whether this error means an unknown job or an unknown source URL.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::JobNotFound(_) | Self::RelocationNotFound { .. }
        )
    }
}
