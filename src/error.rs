use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StagehandError {
    #[error("Invalid task reference '{module}/{stage}': {reason}")]
    InvalidTask {
        module: String,
        stage: String,
        reason: String,
    },

    #[error("Runner preparation failed: {0}")]
    RunnerPrep(String),

    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    #[error("Worker pool is shut down")]
    PoolClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StagehandError>;
