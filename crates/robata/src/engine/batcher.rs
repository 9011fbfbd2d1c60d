use std::sync::Arc;
use async_trait::async_trait;
use crate::backend::{GenerationRequest, Generator};
use crate::communication::{BatchQueue, Pending, Ticket};
use crate::config::BatchConfig;
use crate::core::dispatch::dispatch_loop;
use crate::core::worker::BatchWorkerHandle;
use crate::error::{BatchError, Result};
use crate::metrics::{BatchMetrics, MetricsSnapshot};
use super::core_trait::Batcher;

/// The micro-batching engine fronting one backend.
///
/// Owns the shared [`BatchQueue`], the [`BatchMetrics`] counters, and the
/// handle of the single dispatch worker, which is spawned inside
/// [`BatchEngine::new`] and moves the backend into its task. Construct
/// one engine per backend at service startup and share it (behind an
/// `Arc`) across however many handler tasks the frontend runs; the worker
/// count never changes, so all backend access stays serialized no matter
/// how many producers submit concurrently.
///
/// Dropping the engine shuts the worker down; requests still queued at
/// that point observe [`BatchError::WorkerStopped`].
#[derive(Debug)]
pub struct BatchEngine {
    /// FIFO of tickets shared with the worker
    queue: Arc<BatchQueue<Ticket>>,

    /// Counters the worker updates after each batch
    metrics: Arc<BatchMetrics>,

    /// Bounds used by the worker and default wait budget for callers
    config: BatchConfig,

    /// Lifecycle handle of the dispatch worker
    handle: BatchWorkerHandle,
}

impl BatchEngine {
    /// Builds the engine and starts its dispatch worker.
    ///
    /// # Parameters
    ///
    /// * `backend` - The generator the worker will drive; moved into the
    ///   worker task, which becomes its sole caller
    /// * `config` - Batch bounds and the default caller wait budget
    ///
    /// # Errors
    ///
    /// [`BatchError::Startup`] when no tokio runtime is available to host
    /// the worker. This is fatal to request serving and is surfaced
    /// rather than deferred to the first submit.
    pub fn new<G>(backend: G, config: BatchConfig) -> Result<Self>
    where
        G: Generator,
    {
        tokio::runtime::Handle::try_current()
            .map_err(|missing_runtime| BatchError::Startup(missing_runtime.to_string()))?;

        let queue = Arc::new(BatchQueue::new());
        let metrics = Arc::new(BatchMetrics::new());

        let handle = BatchWorkerHandle::new({
            let queue = queue.clone();
            let metrics = metrics.clone();
            let config = config.clone();
            let backend = Arc::new(backend);

            move |running, shutdown| {
                tokio::spawn(dispatch_loop(
                    backend, queue, metrics, config, running, shutdown,
                ))
            }
        });

        Ok(Self {
            queue,
            metrics,
            config,
            handle,
        })
    }

    /// Enqueues a request and waits for its result using the configured
    /// default budget (`config.request_timeout`).
    ///
    /// See [`Batcher::submit_and_await_with_timeout`] for the timeout
    /// semantics.
    pub async fn submit_and_await(&self, request: GenerationRequest) -> Result<String> {
        let timeout = self.config.request_timeout;
        self.submit_and_await_with_timeout(request, timeout).await
    }

    /// Point-in-time batching statistics plus the active configuration,
    /// for a diagnostics endpoint.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot(&self.config)
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Whether the dispatch worker is still accepting work.
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Stops the dispatch worker.
    ///
    /// Tickets already handed to the backend complete normally; tickets
    /// still queued are dropped and their waiters observe
    /// [`BatchError::WorkerStopped`] or their own timeout.
    pub fn shutdown(&mut self) {
        self.handle.shutdown();
    }
}

#[async_trait]
impl Batcher for BatchEngine {
    /// Builds a ticket, enqueues it, and returns its awaitable slot.
    ///
    /// This is the producer half of the pipeline: it never waits on the
    /// backend, only on the momentary queue lock.
    async fn submit(&self, request: GenerationRequest) -> Result<Pending> {
        if !self.handle.is_running() {
            return Err(BatchError::WorkerStopped);
        }
        let (ticket, pending) = Ticket::new(request);
        self.queue.push(ticket).await;
        Ok(pending)
    }
}
