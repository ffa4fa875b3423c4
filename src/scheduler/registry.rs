use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::scheduler::job::JobRecord;

/// A registry entry. The inner lock guards status+output together so readers
/// never observe a half-applied transition.
pub type SharedJob = Arc<RwLock<JobRecord>>;

/// Concurrency-safe map from job id to its record, the in-memory source of
/// truth while the process is alive.
///
/// The outer lock covers structural operations (insert/lookup) only; record
/// mutation goes through the per-record lock. The two are never held at the
/// same time. Entries are never removed — any future retention policy would
/// live here.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<Uuid, SharedJob>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the shared handle the executing worker
    /// will mutate through.
    pub async fn insert(&self, record: JobRecord) -> SharedJob {
        let id = record.id;
        let shared = Arc::new(RwLock::new(record));
        self.jobs.write().await.insert(id, shared.clone());
        shared
    }

    /// Get a job by id. Unknown ids yield `None`, never a panic.
    pub async fn get(&self, id: &Uuid) -> Option<SharedJob> {
        self.jobs.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &Uuid) -> bool {
        self.jobs.read().await.contains_key(id)
    }

    pub async fn ids(&self) -> Vec<Uuid> {
        self.jobs.read().await.keys().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
