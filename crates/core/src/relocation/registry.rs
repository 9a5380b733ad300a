//! Process-wide collection of jobs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{JobId, JobRecord, JobSnapshot, RelocationError};
use crate::metrics;

/// What the registry does when an outcome is committed for a relocation that
/// already has one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// The later commit replaces the earlier one.
    #[default]
    LastWriteWins,
    /// The later commit fails with [`RelocationError::AlreadyCommitted`].
    RejectRecommit,
}

/// Owns every job created by a relocator. Jobs are never removed.
///
/// Reads hand out copies; nothing outside the registry holds a reference
/// into it.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: HashMap<JobId, JobRecord>,
    policy: CommitPolicy,
}

impl JobRegistry {
    pub fn new(policy: CommitPolicy) -> Self {
        Self {
            jobs: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, job_id: JobId) -> bool {
        self.jobs.contains_key(&job_id)
    }

    /// Creates a job for the distinct URLs in `urls`, stamped with the current time.
    pub fn create_job<I, S>(&mut self, urls: I) -> JobId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create_job_at(urls, Utc::now())
    }

    pub fn create_job_at<I, S>(&mut self, urls: I, time: DateTime<Utc>) -> JobId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut id = JobId::new();
        while self.jobs.contains_key(&id) {
            id = JobId::new();
        }

        self.jobs.insert(id, JobRecord::new(id, urls, time));
        id
    }

    /// Commits an outcome, stamped with the current time.
    pub fn commit(
        &mut self,
        job_id: JobId,
        source_url: &str,
        new_url: Option<String>,
    ) -> Result<(), RelocationError> {
        self.commit_at(Utc::now(), job_id, source_url, new_url)
    }

    pub fn commit_at(
        &mut self,
        time: DateTime<Utc>,
        job_id: JobId,
        source_url: &str,
        new_url: Option<String>,
    ) -> Result<(), RelocationError> {
        let policy = self.policy;
        let job = self
            .jobs
            .get_mut(&job_id)
            .ok_or(RelocationError::JobNotFound(job_id))?;

        if let Some(previous) = job.relocation(source_url).filter(|r| !r.is_pending()) {
            match policy {
                CommitPolicy::LastWriteWins => {
                    warn!(
                        job_id = %job_id,
                        source_url = %source_url,
                        previous = ?previous.new_url(),
                        new = ?new_url,
                        "Overwriting committed relocation"
                    );
                    metrics::RECOMMITS.with_label_values(&["overwritten"]).inc();
                }
                CommitPolicy::RejectRecommit => {
                    warn!(
                        job_id = %job_id,
                        source_url = %source_url,
                        "Rejecting commit for already committed relocation"
                    );
                    metrics::RECOMMITS.with_label_values(&["rejected"]).inc();
                    return Err(RelocationError::AlreadyCommitted {
                        job_id,
                        source_url: source_url.to_string(),
                    });
                }
            }
        }

        job.commit(time, source_url, new_url)
    }

    /// Relocations of `job_id` still waiting for an outcome.
    pub fn pending_count(&self, job_id: JobId) -> Option<usize> {
        self.jobs.get(&job_id).map(JobRecord::pending_count)
    }

    /// Copy of one job.
    pub fn query_job(&self, job_id: JobId) -> Result<JobSnapshot, RelocationError> {
        self.jobs
            .get(&job_id)
            .map(JobRecord::snapshot)
            .ok_or(RelocationError::JobNotFound(job_id))
    }

    /// Copies of every job, in no particular order.
    pub fn jobs(&self) -> Vec<JobSnapshot> {
        self.jobs.values().map(JobRecord::snapshot).collect()
    }
}
