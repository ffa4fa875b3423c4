pub mod job;
pub mod orchestrator;
pub mod pool;
pub mod registry;
pub mod status;

pub use job::{JobMetadata, JobRecord, JobStatus};
pub use orchestrator::JobScheduler;
pub use pool::WorkerPool;
pub use registry::{JobRegistry, SharedJob};
pub use status::StatusResolver;
