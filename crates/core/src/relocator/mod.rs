//! Relocation orchestration.
//!
//! The [`Relocator`] accepts a set of URLs, records them as a job and drives
//! each one through retrieval and then storage, committing the outcome to
//! its registry. Callers observe progress through snapshots only.

mod runner;
mod transition;

pub use runner::Relocator;
pub use transition::{transition, Completion, Outcome, Step};
