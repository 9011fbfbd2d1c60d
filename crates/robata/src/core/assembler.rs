//! Batch assembly under size and time bounds.

use std::time::Duration;
use tokio::time::Instant;
use crate::communication::BatchQueue;

/// Grows a batch from its first item until a bound is hit.
///
/// The window is measured from the moment the caller obtained `first`,
/// which is why this function opens with the deadline computation rather
/// than taking a precomputed one. Each wait uses the *remaining* time
/// until that deadline, recomputed per iteration and saturated at zero,
/// so a slow trickle of arrivals cannot stretch the window.
///
/// Assembly stops when:
/// - the batch reaches `max_size`, or
/// - a timed dequeue comes back empty, or
/// - the deadline passes.
///
/// The result always holds between 1 and `max(max_size, 1)` items. A
/// `max_size` of 0 or 1, or a zero `window`, disables coalescing
/// entirely: the first item is returned alone without touching the clock,
/// giving configuration a deterministic way to turn batching off.
pub async fn assemble_batch<T>(
    queue: &BatchQueue<T>,
    first: T,
    max_size: usize,
    window: Duration,
) -> Vec<T> {
    let mut batch = vec![first];
    if max_size <= 1 || window.is_zero() {
        return batch;
    }

    let deadline = Instant::now() + window;
    while batch.len() < max_size {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match queue.pop_timeout(remaining).await {
            Some(item) => batch.push(item),
            None => break,
        }
    }
    batch
}
