//! Blocking Worker Pool
//!
//! Bounded pool for synchronous work that must not stall the async scheduler.
//! Each job holds one semaphore permit for its whole run on the blocking
//! thread pool, so shutdown can wait for in-flight jobs by taking every permit.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;

/// Worker pool errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerPoolError {
    /// The pool has been shut down.
    #[error("worker pool is shut down")]
    ShutDown,

    /// The job panicked or was aborted.
    #[error("worker task failed: {message}")]
    TaskFailed {
        /// Error details.
        message: String,
    },
}

/// Bounded blocking worker pool.
#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: u32,
}

impl WorkerPool {
    /// Create a pool running at most `size` jobs at once (minimum 1).
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = u32::try_from(size.max(1)).unwrap_or(u32::MAX);
        Self {
            permits: Arc::new(Semaphore::new(size as usize)),
            size,
        }
    }

    /// Pool capacity.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Permits not currently held by a job.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Whether `shutdown` has completed.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.permits.is_closed()
    }

    /// Run `job` on the blocking pool once a slot is free.
    pub async fn run<F, R>(&self, job: F) -> Result<R, WorkerPoolError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| WorkerPoolError::ShutDown)?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| WorkerPoolError::TaskFailed {
            message: e.to_string(),
        })
    }

    /// Wait for every in-flight job, then refuse new ones.
    pub async fn shutdown(&self) {
        if self.permits.is_closed() {
            return;
        }

        // Err means another caller closed it first.
        if let Ok(all) = self.permits.acquire_many(self.size).await {
            self.permits.close();
            drop(all);
        }

        tracing::debug!(size = self.size, "Worker pool drained");
    }
}
