//! Relocator implementation.
//!
//! Each job runs as fire-and-forget work on its own task group:
//! - Retrieval: one task polls every URL of the job concurrently
//! - Storage: one task per retrieved URL, spawned as retrieval completes
//! - Commits: synchronous, inside the completion callbacks

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

use crate::config::RelocatorConfig;
use crate::metrics;
use crate::relocation::{JobId, JobRegistry, JobSnapshot, RelocationError};
use crate::retriever::{retrieve_batch, Retriever};
use crate::storage::{store_batch, Storage};

use super::transition::{transition, Completion, Outcome, Step};

/// Moves the content behind a set of URLs to a new storage location.
pub struct Relocator {
    config: RelocatorConfig,
    retriever: Arc<dyn Retriever>,
    storage: Arc<dyn Storage>,
    registry: Arc<RwLock<JobRegistry>>,
    /// Task group per job. Finished groups are pruned when new jobs start.
    job_tasks: Mutex<HashMap<JobId, TaskTracker>>,
}

impl Relocator {
    /// Create a new relocator.
    pub fn new(
        config: RelocatorConfig,
        retriever: Arc<dyn Retriever>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let registry = JobRegistry::new(config.commit_policy);

        Self {
            config,
            retriever,
            storage,
            registry: Arc::new(RwLock::new(registry)),
            job_tasks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RelocatorConfig {
        &self.config
    }

    pub fn retriever_name(&self) -> &str {
        self.retriever.name()
    }

    pub fn storage_name(&self) -> &str {
        self.storage.name()
    }

    /// Starts relocating the distinct URLs in `urls` and returns immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<I, S>(&self, urls: I) -> JobId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls: Vec<String> = urls
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let job_id = self.registry.write().create_job(urls.iter().cloned());

        metrics::JOBS_CREATED.inc();
        metrics::RELOCATIONS_STARTED.inc_by(urls.len() as u64);
        info!(
            job_id = %job_id,
            urls = urls.len(),
            retriever = self.retriever.name(),
            storage = self.storage.name(),
            "Started relocation job"
        );

        let tasks = TaskTracker::new();
        let handler = CompletionHandler {
            registry: Arc::clone(&self.registry),
            storage: Arc::clone(&self.storage),
            tasks: tasks.clone(),
        };
        let retriever = Arc::clone(&self.retriever);

        tasks.spawn(async move {
            let report = retrieve_batch(retriever.as_ref(), urls, |source_url, content| {
                handler.handle(Completion {
                    job_id,
                    source_url,
                    outcome: Outcome::Retrieved(content),
                });
            })
            .await;

            debug!(
                job_id = %job_id,
                retrieved = report.succeeded,
                failed = report.failed,
                "Retrieval finished"
            );
        });
        // Storage tasks are spawned from inside the retrieval task, so the
        // group cannot drain before they exist.
        tasks.close();

        let mut job_tasks = self.job_tasks.lock();
        job_tasks.retain(|_, t| !t.is_empty());
        job_tasks.insert(job_id, tasks);

        job_id
    }

    /// Copy of one job.
    pub fn query_job(&self, job_id: JobId) -> Result<JobSnapshot, RelocationError> {
        self.registry.read().query_job(job_id)
    }

    /// Copies of every job.
    pub fn jobs(&self) -> Vec<JobSnapshot> {
        self.registry.read().jobs()
    }

    /// Copy of the whole registry.
    pub fn status(&self) -> JobRegistry {
        self.registry.read().clone()
    }

    /// Number of jobs created so far.
    pub fn job_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Number of jobs with work still running.
    pub fn active_jobs(&self) -> usize {
        self.job_tasks
            .lock()
            .values()
            .filter(|t| !t.is_empty())
            .count()
    }

    /// Waits until every task of `job_id` has finished.
    pub async fn wait_for_job(&self, job_id: JobId) -> Result<(), RelocationError> {
        if !self.registry.read().contains(job_id) {
            return Err(RelocationError::JobNotFound(job_id));
        }

        let tasks = self.job_tasks.lock().get(&job_id).cloned();
        if let Some(tasks) = tasks {
            tasks.wait().await;
        }
        Ok(())
    }

    /// Waits until every job started so far has finished.
    pub async fn wait_idle(&self) {
        let groups: Vec<TaskTracker> = self.job_tasks.lock().values().cloned().collect();
        futures::future::join_all(groups.iter().map(TaskTracker::wait)).await;
    }
}

/// Applies stage completions of one job to the registry.
#[derive(Clone)]
struct CompletionHandler {
    registry: Arc<RwLock<JobRegistry>>,
    storage: Arc<dyn Storage>,
    tasks: TaskTracker,
}

impl CompletionHandler {
    fn handle(&self, completion: Completion) {
        let Completion {
            job_id,
            source_url,
            outcome,
        } = completion;

        match transition(outcome) {
            Step::Store(content) => self.store(job_id, source_url, content),
            Step::Commit(new_url) => self.commit(job_id, &source_url, new_url),
        }
    }

    fn store(&self, job_id: JobId, source_url: String, content: Vec<u8>) {
        debug!(job_id = %job_id, source_url = %source_url, bytes = content.len(), "Storing content");

        let handler = self.clone();
        self.tasks.spawn(async move {
            store_batch(handler.storage.as_ref(), vec![content], |_, new_url| {
                handler.handle(Completion {
                    job_id,
                    source_url: source_url.clone(),
                    outcome: Outcome::Stored(new_url),
                });
            })
            .await;
        });
    }

    fn commit(&self, job_id: JobId, source_url: &str, new_url: Option<String>) {
        let result_label = if new_url.is_some() { "stored" } else { "failed" };

        let (result, pending) = {
            let mut registry = self.registry.write();
            let result = registry.commit(job_id, source_url, new_url);
            (result, registry.pending_count(job_id))
        };

        match result {
            Ok(()) => {
                debug!(job_id = %job_id, source_url = %source_url, result = result_label, "Committed relocation");
                metrics::RELOCATIONS_COMMITTED
                    .with_label_values(&[result_label])
                    .inc();
                if pending == Some(0) {
                    info!(job_id = %job_id, "Relocation job complete");
                }
            }
            Err(e) => {
                error!(job_id = %job_id, source_url = %source_url, error = %e, "Failed to commit relocation");
                metrics::RELOCATIONS_COMMITTED
                    .with_label_values(&["error"])
                    .inc();
            }
        }
    }
}
