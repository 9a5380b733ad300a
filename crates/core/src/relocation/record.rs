//! Per-URL relocation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived state of a relocation. Computed from the record, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationState {
    /// No outcome committed yet.
    Pending,
    /// Committed without a new location.
    Failed,
    /// Committed with a new location.
    Stored,
}

impl RelocationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Stored => "stored",
        }
    }
}

/// Outcome of relocating a single source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationRecord {
    source_url: String,
    new_url: Option<String>,
    commit_time: Option<DateTime<Utc>>,
}

impl RelocationRecord {
    /// Creates a pending record for `source_url`.
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            new_url: None,
            commit_time: None,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Location the content was stored at. `None` while pending or after a failure.
    pub fn new_url(&self) -> Option<&str> {
        self.new_url.as_deref()
    }

    pub fn commit_time(&self) -> Option<DateTime<Utc>> {
        self.commit_time
    }

    pub fn is_pending(&self) -> bool {
        self.commit_time.is_none()
    }

    pub fn is_failed(&self) -> bool {
        self.commit_time.is_some() && self.new_url.is_none()
    }

    pub fn is_stored(&self) -> bool {
        self.commit_time.is_some() && self.new_url.is_some()
    }

    pub fn state(&self) -> RelocationState {
        match (&self.commit_time, &self.new_url) {
            (None, _) => RelocationState::Pending,
            (Some(_), None) => RelocationState::Failed,
            (Some(_), Some(_)) => RelocationState::Stored,
        }
    }

    /// Records an outcome. `None` marks the relocation as failed.
    ///
    /// Every call overwrites the previous outcome; guarding against repeated
    /// commits is the registry's job (see [`CommitPolicy`](super::CommitPolicy)).
    pub fn commit(&mut self, time: DateTime<Utc>, new_url: Option<String>) {
        self.new_url = new_url;
        self.commit_time = Some(time);
    }
}
