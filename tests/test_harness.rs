//! Test harness for scheduler integration tests.
//!
//! Provides controllable runner implementations, settings wired to a
//! temporary base directory, and polling helpers.

#![allow(dead_code)]

use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use stagehand::config::Settings;
use stagehand::runner::{RunOutcome, RunnerInvocation, TaskRunner};
use stagehand::scheduler::{JobScheduler, JobStatus};

/// Settings rooted at a temporary base directory, with the scripts area and
/// entry playbook in place so invocation preparation succeeds.
pub fn test_settings(base: &Path) -> Settings {
    let settings = Settings::default().with_base_dir(base).with_max_workers(2);
    std::fs::create_dir_all(settings.scripts_dir()).expect("create scripts dir");
    std::fs::write(settings.playbook_path(), "---\n- hosts: localhost\n").expect("write playbook");
    settings
}

/// Runner that completes after an optional delay with a fixed outcome.
pub struct FakeRunner {
    outcome: RunOutcome,
    delay: Duration,
}

impl FakeRunner {
    pub fn successful(output: &str) -> Self {
        Self {
            outcome: RunOutcome::successful(output),
            delay: Duration::ZERO,
        }
    }

    pub fn failed(output: &str) -> Self {
        Self {
            outcome: RunOutcome::failed(output),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl TaskRunner for FakeRunner {
    async fn run(&self, _invocation: &RunnerInvocation, _cancel: CancellationToken) -> RunOutcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

/// Runner that blocks each invocation until a permit is released, tracking
/// how many invocations have started and how many ran concurrently.
pub struct GatedRunner {
    running: AtomicUsize,
    max_running: AtomicUsize,
    started: AtomicUsize,
    gate: Semaphore,
}

impl GatedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
            started: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        })
    }

    /// Let `n` blocked invocations finish.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Invocations currently executing.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// High-water mark of concurrent invocations.
    pub fn max_running(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }

    /// Total invocations that began executing.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskRunner for GatedRunner {
    async fn run(&self, _invocation: &RunnerInvocation, _cancel: CancellationToken) -> RunOutcome {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);

        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();

        self.running.fetch_sub(1, Ordering::SeqCst);
        RunOutcome::successful("gated run complete\n")
    }
}

/// Current status for a job the scheduler must know about.
pub async fn status_of(scheduler: &JobScheduler, id: &Uuid) -> JobStatus {
    scheduler
        .job_status(id)
        .await
        .expect("status lookup failed")
        .expect("job should be known")
}

/// Wait for a condition to become true with timeout
pub async fn wait_for<F, Fut>(
    condition: F,
    timeout_duration: Duration,
    poll_interval: Duration,
) -> bool
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = tokio::time::Instant::now();
    while start.elapsed() < timeout_duration {
        if condition().await {
            return true;
        }
        tokio::time::sleep(poll_interval).await;
    }
    false
}

/// Assert a condition eventually becomes true
pub async fn assert_eventually<F, Fut>(condition: F, timeout_duration: Duration, message: &str)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    let result = wait_for(condition, timeout_duration, Duration::from_millis(10)).await;
    assert!(result, "{}", message);
}
