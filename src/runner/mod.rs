//! External task runner boundary.
//!
//! The scheduler treats the runner as an opaque collaborator: given a
//! prepared invocation it performs the automation for a module/stage pair
//! and eventually reports a terminal status plus captured output. Nothing
//! beyond that outcome is inspected.
//!
//! # Components
//!
//! - [`RunnerInvocation`]: validated, directory-resolved description of one
//!   runner call, built before a job is registered
//! - [`TaskRunner`]: the seam the scheduler executes through
//! - [`PlaybookRunner`]: production implementation spawning the runner binary

pub mod invocation;
pub mod playbook;

pub use invocation::RunnerInvocation;
pub use playbook::PlaybookRunner;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::scheduler::job::JobStatus;

/// Terminal outcome of one runner invocation.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// `Successful` or `Failed`, as reported by the runner.
    pub status: JobStatus,
    /// Captured output text, possibly empty.
    pub output: String,
}

impl RunOutcome {
    pub fn successful(output: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Successful,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            output: output.into(),
        }
    }
}

/// Executes a prepared invocation to completion.
///
/// The call blocks its pool worker until the runner reaches a terminal
/// outcome; there is no intermediate progress reporting. `cancel` is
/// threaded through so a timeout policy can be layered in later without
/// changing this contract — no implementation acts on it today.
#[async_trait]
pub trait TaskRunner: Send + Sync + 'static {
    async fn run(&self, invocation: &RunnerInvocation, cancel: CancellationToken) -> RunOutcome;
}
