use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Scheduled,
    Running,
    Successful,
    Failed,
    Canceled,
}

impl JobStatus {
    /// Terminal statuses permit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Successful | JobStatus::Failed | JobStatus::Canceled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Scheduled => write!(f, "scheduled"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Successful => write!(f, "successful"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown job status: {0}")]
pub struct UnknownStatus(String);

impl std::str::FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(JobStatus::Scheduled),
            "running" => Ok(JobStatus::Running),
            "successful" => Ok(JobStatus::Successful),
            "failed" => Ok(JobStatus::Failed),
            "canceled" => Ok(JobStatus::Canceled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// One scheduled unit of work.
///
/// `status` and `output` are mutated only by the pool worker executing this
/// job (single-writer discipline, enforced by the per-record lock the
/// registry wraps each record in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    /// Correlation id of the external runner invocation, assigned when the
    /// invocation is prepared.
    pub runner_id: Option<Uuid>,
    pub status: JobStatus,
    /// Captured runner output, empty until a terminal status is reached.
    #[serde(default)]
    pub output: String,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn new(runner_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            runner_id,
            status: JobStatus::Scheduled,
            output: String::new(),
            created_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Durable mirror of a [`JobRecord`], minus the output text (which is
/// persisted separately). Written at creation and on every status
/// transition; read back to recover status after a process restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub id: Uuid,
    pub runner_id: Option<Uuid>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<&JobRecord> for JobMetadata {
    fn from(record: &JobRecord) -> Self {
        Self {
            id: record.id,
            runner_id: record.runner_id,
            status: record.status,
            created_at: record.created_at,
            finished_at: record.finished_at,
        }
    }
}
