//! Lifecycle management for the background dispatch task.

use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use tokio::{task::JoinHandle, sync::Notify};

/// A handle for managing the long-lived dispatch worker.
///
/// Spawning happens exactly once, inside [`BatchWorkerHandle::new`]; the
/// handle then owns the running flag and the shutdown notifier for the
/// task it created. Because the engine constructs its handle during
/// service startup, there is no lazy first-request start path and nothing
/// to guard against double-starting: one handle, one worker.
///
/// Shutdown is cooperative: the flag flips, the notifier wakes the worker
/// out of its idle wait, and the worker observes the flag and returns.
/// Dropping the handle triggers the same sequence.
#[derive(Debug)]
pub struct BatchWorkerHandle {
    /// Flag indicating whether the worker should continue running
    running: Arc<AtomicBool>,

    /// Handle to the spawned task, becomes `None` once shutdown begins
    handle: Option<JoinHandle<()>>,

    /// Wakes the worker so it can observe a cleared running flag
    shutdown_notifier: Arc<Notify>,
}

impl BatchWorkerHandle {
    /// Spawns the worker and returns its handle.
    ///
    /// # Parameters
    ///
    /// * `task` - Receives the running flag and shutdown notifier, and is
    ///   responsible for spawning the actual worker task. The worker must
    ///   exit promptly once the flag reads `false`.
    pub fn new<F>(task: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>, Arc<Notify>) -> JoinHandle<()> + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let shutdown_notifier = Arc::new(Notify::new());
        let handle = task(running.clone(), shutdown_notifier.clone());

        Self {
            running,
            handle: Some(handle),
            shutdown_notifier,
        }
    }

    /// Whether the worker is still accepting work.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Initiates a graceful shutdown of the worker.
    ///
    /// This method:
    /// 1. Clears the running flag
    /// 2. Wakes the worker so it can observe the flag
    /// 3. Takes the join handle and awaits it from a detached task
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown_notifier.notify_one();

        if let Some(handle) = self.handle.take() {
            tokio::spawn(async move {
                let _ = handle.await;
            });
        }
    }
}

impl Drop for BatchWorkerHandle {
    /// Ensures the worker is terminated when the handle is dropped.
    fn drop(&mut self) {
        self.shutdown();
    }
}
