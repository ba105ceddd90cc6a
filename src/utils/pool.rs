//! Bounded background worker pool
//!
//! Tasks are spawned onto the tokio runtime, but at most `size` of them run at
//! once; extra submissions wait for a free slot. A task that has started keeps
//! running to completion even if the submitter stops waiting for it.

use crate::types::{AppError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(1)
    }
}

impl WorkerPool {
    /// Create a pool running at most `size` tasks concurrently (minimum 1).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of workers currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Dispatch `task` onto a worker and wait for its result.
    pub async fn run<F, T>(&self, task: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| AppError::Internal("worker pool is closed".to_string()))?;

        let handle = tokio::spawn(async move {
            let _permit = permit;
            task.await
        });

        handle
            .await
            .map_err(|e| AppError::Internal(format!("worker task failed: {}", e)))?
    }
}
