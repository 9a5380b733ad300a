//! Per-relocation state transitions.
//!
//! ```text
//! pending --retrieved(content)--> storing --stored(url)--> stored
//! pending --retrieved(none)----------------------------->  failed
//! storing --stored(none)-------------------------------->  failed
//! ```
//!
//! `storing` is never written to the registry; the record reads as pending
//! until the store outcome is committed.

use crate::relocation::JobId;

/// Result of one stage for one relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Retrieved(Option<Vec<u8>>),
    Stored(Option<String>),
}

/// A stage outcome addressed to a relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub job_id: JobId,
    pub source_url: String,
    pub outcome: Outcome,
}

/// What to do next with a relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Hand the content to storage.
    Store(Vec<u8>),
    /// Commit the final outcome. `None` means failed.
    Commit(Option<String>),
}

pub fn transition(outcome: Outcome) -> Step {
    match outcome {
        Outcome::Retrieved(Some(content)) => Step::Store(content),
        Outcome::Retrieved(None) => Step::Commit(None),
        Outcome::Stored(new_url) => Step::Commit(new_url),
    }
}
