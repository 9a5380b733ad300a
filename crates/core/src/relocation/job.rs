//! Job record and its identifier.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RelocationError, RelocationRecord};

/// Unique identifier of a relocation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Allocates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for JobId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A set of relocations started together.
///
/// The set of source URLs is fixed at creation. Only the outcomes of the
/// individual relocations, and `update_time`, change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    id: JobId,
    create_time: DateTime<Utc>,
    update_time: DateTime<Utc>,
    relocations: BTreeMap<String, RelocationRecord>,
}

impl JobRecord {
    /// Creates a job with one pending relocation per distinct URL.
    pub fn new<I, S>(id: JobId, urls: I, time: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let relocations = urls
            .into_iter()
            .map(Into::into)
            .map(|url: String| (url.clone(), RelocationRecord::new(url)))
            .collect();

        Self {
            id,
            create_time: time,
            update_time: time,
            relocations,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    pub fn update_time(&self) -> DateTime<Utc> {
        self.update_time
    }

    pub fn len(&self) -> usize {
        self.relocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relocations.is_empty()
    }

    pub fn contains(&self, source_url: &str) -> bool {
        self.relocations.contains_key(source_url)
    }

    /// Number of relocations without an outcome.
    pub fn pending_count(&self) -> usize {
        self.relocations.values().filter(|r| r.is_pending()).count()
    }

    pub(crate) fn relocation(&self, source_url: &str) -> Option<&RelocationRecord> {
        self.relocations.get(source_url)
    }

    /// Copies of every relocation, ordered by source URL.
    pub fn relocations(&self) -> Vec<RelocationRecord> {
        self.relocations.values().cloned().collect()
    }

    /// Commits the outcome for one source URL.
    ///
    /// `update_time` never moves backwards, even if `time` is older than a
    /// previous commit.
    pub fn commit(
        &mut self,
        time: DateTime<Utc>,
        source_url: &str,
        new_url: Option<String>,
    ) -> Result<(), RelocationError> {
        let job_id = self.id;
        let record = self.relocations.get_mut(source_url).ok_or_else(|| {
            RelocationError::RelocationNotFound {
                job_id,
                source_url: source_url.to_string(),
            }
        })?;

        record.commit(time, new_url);
        self.update_time = self.update_time.max(time);
        Ok(())
    }

    /// Independent copy of this job.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            create_time: self.create_time,
            update_time: self.update_time,
            relocations: self.relocations(),
        }
    }
}

/// Point-in-time copy of a job, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub relocations: Vec<RelocationRecord>,
}

impl JobSnapshot {
    pub fn pending(&self) -> impl Iterator<Item = &RelocationRecord> {
        self.relocations.iter().filter(|r| r.is_pending())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RelocationRecord> {
        self.relocations.iter().filter(|r| r.is_failed())
    }

    pub fn stored(&self) -> impl Iterator<Item = &RelocationRecord> {
        self.relocations.iter().filter(|r| r.is_stored())
    }

    /// True once no relocation is pending. An empty job is complete.
    pub fn is_complete(&self) -> bool {
        self.pending().next().is_none()
    }

    pub fn relocation(&self, source_url: &str) -> Option<&RelocationRecord> {
        self.relocations.iter().find(|r| r.source_url() == source_url)
    }
}
