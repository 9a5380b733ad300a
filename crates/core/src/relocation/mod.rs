//! Job and relocation data model.
//!
//! A [`JobRecord`] groups one [`RelocationRecord`] per distinct source URL.
//! The [`JobRegistry`] owns all jobs and only ever hands out copies
//! ([`JobSnapshot`]), so callers never observe a record changing under them.

mod error;
mod job;
mod record;
mod registry;
mod report;

pub use error::RelocationError;
pub use job::{JobId, JobRecord, JobSnapshot};
pub use record::{RelocationRecord, RelocationState};
pub use registry::{CommitPolicy, JobRegistry};
pub use report::{JobStatus, JobStatusReport, UploadBreakdown, UploadedList};
