use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, StagehandError};

type PoolTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Fixed-size pool of tokio workers draining a shared task queue.
///
/// Submission is fire-and-forget: completion is observed through the job
/// registry, not through a returned handle. Throughput is bounded to
/// `max_workers` concurrently running tasks regardless of queue depth.
pub struct WorkerPool {
    tx: mpsc::UnboundedSender<PoolTask>,
    cancel: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let rx = Arc::new(Mutex::new(rx));
        let cancel = CancellationToken::new();

        let mut workers = Vec::with_capacity(max_workers);
        for worker_id in 0..max_workers {
            let rx = rx.clone();
            let cancel = cancel.clone();
            workers.push(tokio::spawn(worker_loop(worker_id, rx, cancel)));
        }

        tracing::info!(max_workers, "Created worker pool");

        Self {
            tx,
            cancel,
            workers: Mutex::new(workers),
        }
    }

    /// Enqueue a unit of work. Returns immediately; one of the pool workers
    /// will eventually execute it. Fails once shutdown has begun.
    pub fn submit<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return Err(StagehandError::PoolClosed);
        }
        self.tx
            .send(Box::pin(task))
            .map_err(|_| StagehandError::PoolClosed)
    }

    /// Graceful shutdown: stop accepting submissions, discard tasks that
    /// have not started (they never run), and wait for every task already
    /// executing to finish naturally. In-flight runner invocations are not
    /// interrupted — the external runner offers no safe cancellation point.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let mut workers = self.workers.lock().await;
        for handle in workers.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Worker task failed during shutdown");
            }
        }
        tracing::info!("Worker pool shut down");
    }

    pub fn is_shutdown(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<PoolTask>>>,
    cancel: CancellationToken,
) {
    loop {
        // The queue lock is held only while waiting for the next task,
        // never while running one.
        let task = {
            let mut rx = rx.lock().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                task = rx.recv() => task,
            }
        };

        let Some(task) = task else {
            break;
        };
        task.await;
    }
    tracing::debug!(worker_id, "Worker exited");
}
