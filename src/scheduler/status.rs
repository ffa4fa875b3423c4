use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::persist::JobStore;
use crate::scheduler::job::JobStatus;
use crate::scheduler::registry::JobRegistry;

/// Resolves a job's current status behind one interface, regardless of
/// where it lives.
///
/// Two strategies, selected by whether the id is known to this process:
/// the in-memory registry (fast path), or the durable metadata mirror —
/// consulting the runner's own status artifact when the mirror is still
/// non-terminal (restart path).
pub struct StatusResolver {
    registry: Arc<JobRegistry>,
    store: Arc<JobStore>,
}

impl StatusResolver {
    pub fn new(registry: Arc<JobRegistry>, store: Arc<JobStore>) -> Self {
        Self { registry, store }
    }

    /// `Ok(None)` means the id is unknown everywhere; an `Err` means the
    /// durable document exists but could not be recovered.
    pub async fn resolve(&self, id: &Uuid) -> Result<Option<JobStatus>> {
        if let Some(job) = self.registry.get(id).await {
            return Ok(Some(job.read().await.status));
        }
        self.resolve_durable(id).await
    }

    async fn resolve_durable(&self, id: &Uuid) -> Result<Option<JobStatus>> {
        let Some(meta) = self.store.read_metadata(id).await? else {
            return Ok(None);
        };

        if meta.status.is_terminal() {
            return Ok(Some(meta.status));
        }

        // The mirror went stale with the process that wrote it; the runner's
        // own artifact may know the terminal outcome.
        if let Some(runner_id) = meta.runner_id {
            if let Some(raw) = self.store.read_runner_status(&runner_id).await {
                match raw.parse::<JobStatus>() {
                    Ok(status) => return Ok(Some(status)),
                    Err(_) => {
                        tracing::warn!(
                            job_id = %id,
                            runner_status = %raw,
                            "Unrecognized runner status artifact"
                        );
                    }
                }
            }
        }

        Ok(Some(meta.status))
    }
}
