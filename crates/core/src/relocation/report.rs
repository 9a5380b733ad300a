//! Client-facing projections of job snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{JobId, JobSnapshot};

/// Aggregate progress of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    /// Nothing committed yet.
    Pending,
    /// Some, but not all, relocations committed.
    InProgress,
    /// No relocation pending.
    Complete,
}

/// Relocations of a job grouped by state.
///
/// `pending` and `failed` list source URLs; `complete` lists the new locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadBreakdown {
    pub pending: Vec<String>,
    pub complete: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub id: JobId,
    pub created: DateTime<Utc>,
    /// Time of the last commit, once the job is complete.
    pub finished: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub uploaded: UploadBreakdown,
}

impl From<&JobSnapshot> for JobStatusReport {
    fn from(job: &JobSnapshot) -> Self {
        let mut uploaded = UploadBreakdown::default();
        for record in &job.relocations {
            match record.new_url() {
                _ if record.is_pending() => uploaded.pending.push(record.source_url().to_string()),
                Some(new_url) => uploaded.complete.push(new_url.to_string()),
                None => uploaded.failed.push(record.source_url().to_string()),
            }
        }

        let status = if uploaded.pending.is_empty() {
            JobStatus::Complete
        } else if uploaded.pending.len() == job.relocations.len() {
            JobStatus::Pending
        } else {
            JobStatus::InProgress
        };

        Self {
            id: job.id,
            created: job.create_time,
            finished: (status == JobStatus::Complete).then_some(job.update_time),
            status,
            uploaded,
        }
    }
}

/// Every new location produced across a set of jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedList {
    pub uploaded: Vec<String>,
}

impl UploadedList {
    pub fn from_jobs(jobs: &[JobSnapshot]) -> Self {
        let uploaded = jobs
            .iter()
            .flat_map(|job| job.relocations.iter())
            .filter_map(|record| record.new_url().map(str::to_string))
            .collect();

        Self { uploaded }
    }
}
