use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use serde::Serialize;
use crate::config::BatchConfig;

/// Process-wide batching counters.
///
/// Written only by the dispatch worker, once per completed batch; read
/// concurrently by diagnostics callers. Plain atomics are enough: there
/// is no cross-counter invariant a reader could tear beyond
/// `total_items_batched >= batches_processed`, and both grow
/// monotonically.
#[derive(Debug, Default)]
pub struct BatchMetrics {
    /// Count of batches the worker has completed
    batches_processed: AtomicU64,

    /// Sum of items across all completed batches
    total_items_batched: AtomicU64,
}

impl BatchMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed batch of `size` items.
    ///
    /// Called by the worker after every ticket in the batch has been
    /// completed. Every batch holds at least one item.
    pub fn record_batch(&self, size: usize) {
        self.batches_processed.fetch_add(1, Ordering::Relaxed);
        self.total_items_batched
            .fetch_add(size as u64, Ordering::Relaxed);
    }

    /// Number of batches completed so far.
    pub fn batches_processed(&self) -> u64 {
        self.batches_processed.load(Ordering::Relaxed)
    }

    /// Total items across all completed batches.
    pub fn total_items_batched(&self) -> u64 {
        self.total_items_batched.load(Ordering::Relaxed)
    }

    /// Captures a point-in-time view alongside the configuration that
    /// produced it.
    pub fn snapshot(&self, config: &BatchConfig) -> MetricsSnapshot {
        let batches_processed = self.batches_processed();
        let total_items_batched = self.total_items_batched();
        let average_batch_size = if batches_processed == 0 {
            0.0
        } else {
            total_items_batched as f64 / batches_processed as f64
        };
        MetricsSnapshot {
            batches_processed,
            total_items_batched,
            average_batch_size,
            max_batch_delay: config.max_batch_delay,
            max_batch_size: config.max_batch_size,
        }
    }
}

/// Point-in-time batching statistics for a diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Batches completed since startup
    pub batches_processed: u64,

    /// Items completed since startup, across all batches
    pub total_items_batched: u64,

    /// `total_items_batched / batches_processed`, or 0 before the first
    /// batch
    pub average_batch_size: f64,

    /// The configured assembly window
    pub max_batch_delay: Duration,

    /// The configured maximum batch size
    pub max_batch_size: usize,
}
