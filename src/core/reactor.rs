//! Background runtime for the LiveReload server
//!
//! The accept loop and every per-connection task run on a runtime owned by
//! the server, separate from whatever thread called `start`.

use log::info;
use std::future::Future;
use tokio::runtime::{Builder, EnterGuard, Runtime};
use tokio::task::JoinHandle;

use crate::constants::REACTOR_THREAD_NAME;
use crate::error::{LiveReloadError, Result};

/// Owned multi-threaded runtime that can be torn down abruptly
pub struct Reactor {
    /// `None` once the reactor has been shut down
    runtime: Option<Runtime>,
    /// Number of worker threads in the runtime
    worker_count: usize,
}

impl Reactor {
    /// Create a new reactor with the specified number of worker threads
    ///
    /// # Arguments
    /// * `worker_count` - Number of worker threads to create
    ///
    /// # Returns
    /// A `Result` containing the `Reactor` or an error
    pub fn new(worker_count: usize) -> Result<Self> {
        let actual_workers = worker_count.max(1);

        let runtime = match Builder::new_multi_thread()
            .worker_threads(actual_workers)
            .enable_all()
            .thread_name(REACTOR_THREAD_NAME)
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                return Err(LiveReloadError::RuntimeError(format!(
                    "Failed to build reactor runtime: {}",
                    e
                )))
            }
        };

        Ok(Self {
            runtime: Some(runtime),
            worker_count: actual_workers,
        })
    }

    /// Enter the runtime context so synchronous code can create tokio resources
    pub fn enter(&self) -> Result<EnterGuard<'_>> {
        self.runtime
            .as_ref()
            .map(|rt| rt.enter())
            .ok_or_else(|| LiveReloadError::RuntimeError("Reactor is stopped".to_string()))
    }

    /// Spawn a task on the reactor
    pub fn spawn<F>(&self, future: F) -> Result<JoinHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime
            .as_ref()
            .map(|rt| rt.spawn(future))
            .ok_or_else(|| LiveReloadError::RuntimeError("Reactor is stopped".to_string()))
    }

    /// Drop every task without waiting for them. Safe to call repeatedly
    /// and from inside another runtime.
    pub fn shutdown(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            info!("Shutting down reactor with {} worker threads", self.worker_count);
            runtime.shutdown_background();
        }
    }

    pub fn is_running(&self) -> bool {
        self.runtime.is_some()
    }

    /// Get the number of worker threads in the runtime
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

impl Drop for Reactor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
