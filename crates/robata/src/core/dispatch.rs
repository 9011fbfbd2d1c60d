//! The dispatch worker loop.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use futures::FutureExt;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{error, info, warn};
use crate::backend::Generator;
use crate::communication::{BatchQueue, Ticket};
use crate::config::BatchConfig;
use crate::metrics::BatchMetrics;
use super::assembler::assemble_batch;

/// Runs the single dispatch worker until shutdown.
///
/// Each turn of the loop:
/// 1. Suspends until a ticket is available (or the shutdown notifier
///    fires; no busy-polling while idle).
/// 2. Assembles a batch under the configured size and window bounds.
/// 3. Invokes the backend once per ticket, in arrival order, completing
///    every ticket on every path. A backend failure is captured into
///    that ticket alone and the rest of the batch proceeds.
/// 4. Records the batch in the metrics counters and logs a summary line.
///
/// The assemble-and-process body runs inside a recovery boundary: if it
/// panics, the fault is logged and the loop continues with the next
/// ticket. Tickets dropped by such a fault close their completion
/// channels, so their waiters fail fast instead of hanging. The loop
/// itself only exits when the running flag clears; a backend error can
/// never terminate it.
pub async fn dispatch_loop<G>(
    backend: Arc<G>,
    queue: Arc<BatchQueue<Ticket>>,
    metrics: Arc<BatchMetrics>,
    config: BatchConfig,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
) where
    G: Generator,
{
    loop {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let first = tokio::select! {
            ticket = queue.pop() => ticket,
            // Woken for shutdown; loop back and re-check the flag
            _ = shutdown.notified() => continue,
        };

        let iteration = process_next_batch(backend.as_ref(), &queue, &metrics, &config, first);
        if let Err(panic) = AssertUnwindSafe(iteration).catch_unwind().await {
            error!(
                panic = panic_message(panic.as_ref()),
                "dispatch iteration panicked; worker recovering"
            );
        }
    }
}

/// One worker iteration: assemble a batch around `first`, process it,
/// account for it.
async fn process_next_batch<G>(
    backend: &G,
    queue: &BatchQueue<Ticket>,
    metrics: &BatchMetrics,
    config: &BatchConfig,
    first: Ticket,
) where
    G: Generator,
{
    let batch = assemble_batch(
        queue,
        first,
        config.max_batch_size,
        config.max_batch_delay,
    )
    .await;

    let size = batch.len();
    let started = Instant::now();

    for ticket in batch {
        let result = backend.generate(ticket.request()).await;
        if let Err(generation_error) = &result {
            warn!(
                ticket = %ticket.id(),
                error = %generation_error,
                "generation failed; completing ticket with error"
            );
        }
        ticket.complete(result);
    }

    let total = started.elapsed();
    metrics.record_batch(size);
    info!(
        size,
        total_ms = total.as_millis() as u64,
        avg_per_item_ms = (total / size as u32).as_millis() as u64,
        window_ms = config.max_batch_delay.as_millis() as u64,
        max_size = config.max_batch_size,
        "batch processed"
    );
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use async_trait::async_trait;
    use crate::backend::mock::MockGenerator;
    use crate::backend::GenerationRequest;
    use crate::error::{BatchError, GenerationError};

    struct Harness {
        queue: Arc<BatchQueue<Ticket>>,
        metrics: Arc<BatchMetrics>,
        running: Arc<AtomicBool>,
        shutdown: Arc<Notify>,
    }

    /// Capture worker logs in test output; repeated init attempts are
    /// fine, only the first wins.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    impl Harness {
        fn start<G: Generator>(backend: Arc<G>, config: BatchConfig) -> Self {
            init_tracing();
            let queue = Arc::new(BatchQueue::new());
            let metrics = Arc::new(BatchMetrics::new());
            let running = Arc::new(AtomicBool::new(true));
            let shutdown = Arc::new(Notify::new());

            tokio::spawn(dispatch_loop(
                backend,
                queue.clone(),
                metrics.clone(),
                config,
                running.clone(),
                shutdown.clone(),
            ));

            Self {
                queue,
                metrics,
                running,
                shutdown,
            }
        }

        async fn submit(&self, prompt: &str) -> crate::communication::Pending {
            let (ticket, pending) = Ticket::new(GenerationRequest::new(prompt, 8));
            self.queue.push(ticket).await;
            pending
        }

        fn stop(&self) {
            self.running.store(false, Ordering::SeqCst);
            self.shutdown.notify_one();
        }
    }

    fn small_window() -> BatchConfig {
        BatchConfig::default().with_max_batch_delay(Duration::from_millis(20))
    }

    #[tokio::test]
    async fn completes_each_ticket_with_its_own_output() {
        let backend = Arc::new(MockGenerator::new());
        let harness = Harness::start(backend, small_window());

        let a = harness.submit("a").await;
        let b = harness.submit("b").await;

        assert_eq!(a.await.unwrap(), "echo: a");
        assert_eq!(b.await.unwrap(), "echo: b");
        harness.stop();
    }

    #[tokio::test]
    async fn backend_failure_is_isolated_to_its_ticket() {
        // Batch of three where only the middle item fails
        let backend = Arc::new(MockGenerator::new());
        let harness = Harness::start(backend, small_window());

        let first = harness.submit("one").await;
        let second = harness.submit("fail: device lost").await;
        let third = harness.submit("three").await;

        assert_eq!(first.await.unwrap(), "echo: one");
        let err = second.await.unwrap_err();
        assert!(matches!(err, BatchError::Generation(_)));
        assert_eq!(third.await.unwrap(), "echo: three");
        harness.stop();
    }

    #[tokio::test]
    async fn records_metrics_after_each_batch() {
        let backend = Arc::new(MockGenerator::new());
        let harness = Harness::start(backend, small_window());

        let pending = harness.submit("solo").await;
        pending.await.unwrap();

        // The counters are updated after the batch completes
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(harness.metrics.batches_processed(), 1);
        assert_eq!(harness.metrics.total_items_batched(), 1);
        harness.stop();
    }

    #[tokio::test]
    async fn dispatches_in_arrival_order() {
        // Zero window so every ticket becomes its own batch, making the
        // backend's call log a direct record of dispatch order
        let backend = Arc::new(MockGenerator::new());
        let config = BatchConfig::default().with_max_batch_delay(Duration::ZERO);
        let harness = Harness::start(backend.clone(), config);

        let mut pendings = Vec::new();
        for i in 0..6 {
            pendings.push(harness.submit(&format!("p{i}")).await);
        }
        for pending in pendings {
            pending.await.unwrap();
        }

        let expected: Vec<String> = (0..6).map(|i| format!("p{i}")).collect();
        assert_eq!(backend.calls(), expected);
        harness.stop();
    }

    struct PanickingGenerator;

    #[async_trait]
    impl Generator for PanickingGenerator {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<String, GenerationError> {
            if request.prompt().starts_with("panic") {
                panic!("backend blew up");
            }
            Ok(format!("ok: {}", request.prompt()))
        }
    }

    #[tokio::test]
    async fn worker_survives_a_panicking_iteration() {
        let backend = Arc::new(PanickingGenerator);
        let harness = Harness::start(backend, small_window());

        let poisoned = harness.submit("panic now").await;
        // The panic drops the ticket, closing its channel
        assert!(matches!(poisoned.await, Err(BatchError::WorkerStopped)));

        // The loop recovered and still serves new work
        let healthy = harness.submit("next").await;
        assert_eq!(healthy.await.unwrap(), "ok: next");
        harness.stop();
    }

    #[tokio::test]
    async fn stops_when_running_flag_clears() {
        let backend = Arc::new(MockGenerator::new());
        let harness = Harness::start(backend, small_window());

        harness.stop();
        tokio::time::sleep(Duration::from_millis(20)).await;

        // A ticket enqueued after shutdown is never completed; its waiter
        // times out rather than hanging forever
        let pending = harness.submit("late").await;
        let result = tokio::time::timeout(Duration::from_millis(100), pending).await;
        assert!(result.is_err());
    }
}
