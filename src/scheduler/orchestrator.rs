use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::Settings;
use crate::error::Result;
use crate::persist::JobStore;
use crate::runner::{PlaybookRunner, RunnerInvocation, TaskRunner};
use crate::scheduler::job::{JobMetadata, JobRecord, JobStatus};
use crate::scheduler::pool::WorkerPool;
use crate::scheduler::registry::{JobRegistry, SharedJob};
use crate::scheduler::status::StatusResolver;

/// The scheduling façade: creates jobs, submits them to the worker pool,
/// keeps registry and durable store in step as execution progresses, and
/// answers status/output queries.
///
/// Constructed once at process start and shared by `Arc` with the HTTP
/// state and every worker task; there is no ambient singleton.
pub struct JobScheduler {
    settings: Settings,
    registry: Arc<JobRegistry>,
    store: Arc<JobStore>,
    pool: WorkerPool,
    runner: Arc<dyn TaskRunner>,
    resolver: StatusResolver,
    cancel: CancellationToken,
}

impl JobScheduler {
    pub fn new(settings: Settings, runner: Arc<dyn TaskRunner>) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let store = Arc::new(JobStore::new(&settings));
        let pool = WorkerPool::new(settings.max_workers);
        let resolver = StatusResolver::new(registry.clone(), store.clone());

        Self {
            settings,
            registry,
            store,
            pool,
            runner,
            resolver,
            cancel: CancellationToken::new(),
        }
    }

    /// Production construction: execute jobs through the configured external
    /// runner binary.
    pub fn with_playbook_runner(settings: Settings) -> Self {
        let runner = Arc::new(PlaybookRunner::new(settings.runner_bin.clone()));
        Self::new(settings, runner)
    }

    /// Create and schedule a job for a module/stage pair.
    ///
    /// Invocation preparation fails fast — on a malformed reference or
    /// missing runner input no job is registered and nothing is persisted.
    /// On success the id is returned before execution has necessarily
    /// started; callers observe progress via [`Self::job_status`].
    pub async fn create_job(&self, module: &str, stage: &str) -> Result<Uuid> {
        let invocation = RunnerInvocation::prepare(&self.settings, module, stage)?;

        let record = JobRecord::new(Some(invocation.ident));
        let id = record.id;
        let meta = JobMetadata::from(&record);
        let shared = self.registry.insert(record).await;

        if let Err(e) = self.store.write_metadata(&meta).await {
            tracing::warn!(job_id = %id, error = %e, "Failed to persist job metadata");
        }

        self.pool.submit(execute(
            shared,
            self.store.clone(),
            self.runner.clone(),
            invocation,
            self.cancel.child_token(),
        ))?;

        tracing::info!(job_id = %id, module, stage, "Job scheduled");
        Ok(id)
    }

    /// Current status for a job id, or `None` when the id is unknown both
    /// in-memory and durably.
    pub async fn job_status(&self, id: &Uuid) -> Result<Option<JobStatus>> {
        self.resolver.resolve(id).await
    }

    /// Captured output for a job id: `None` for unknown ids, empty text
    /// before a terminal status, the runner's output verbatim after. Never
    /// waits for completion.
    pub async fn job_output(&self, id: &Uuid) -> Option<String> {
        if let Some(job) = self.registry.get(id).await {
            let job = job.read().await;
            if job.status.is_terminal() {
                return Some(job.output.clone());
            }
            return Some(String::new());
        }

        // Restart path: only ids with a durable mirror are known at all.
        match self.store.read_metadata(id).await {
            Ok(Some(_)) => Some(self.store.read_output(id).await),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "Failed to read job metadata");
                None
            }
        }
    }

    /// Graceful shutdown: queued-but-unstarted jobs are discarded (their
    /// records stay `scheduled`), running jobs finish naturally.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down job scheduler");
        self.pool.shutdown().await;
    }

    pub async fn job_count(&self) -> usize {
        self.registry.len().await
    }
}

/// The unit of work a pool worker executes: drive one job through
/// `running` to its terminal status, mirroring each transition durably.
async fn execute(
    shared: SharedJob,
    store: Arc<JobStore>,
    runner: Arc<dyn TaskRunner>,
    invocation: RunnerInvocation,
    cancel: CancellationToken,
) {
    let (id, meta) = {
        let mut job = shared.write().await;
        job.status = JobStatus::Running;
        (job.id, JobMetadata::from(&*job))
    };
    if let Err(e) = store.write_metadata(&meta).await {
        tracing::warn!(job_id = %id, error = %e, "Failed to persist job metadata");
    }
    tracing::info!(job_id = %id, ident = %invocation.ident, "Job running");

    let outcome = runner.run(&invocation, cancel).await;

    let (meta, output) = {
        let mut job = shared.write().await;
        job.status = outcome.status;
        job.output = outcome.output;
        job.finished_at = Some(Utc::now());
        (JobMetadata::from(&*job), job.output.clone())
    };
    if let Err(e) = store.write_metadata(&meta).await {
        tracing::warn!(job_id = %id, error = %e, "Failed to persist job metadata");
    }
    if !output.is_empty() {
        if let Err(e) = store.write_output(&id, &output).await {
            tracing::warn!(job_id = %id, error = %e, "Failed to persist job output");
        }
    }

    tracing::info!(job_id = %id, status = %meta.status, "Job finished");
}
