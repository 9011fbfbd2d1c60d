use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

/// # BatchQueue
///
/// Unbounded FIFO queue shared between request handlers (producers) and
/// the single dispatch worker (consumer).
///
/// Handlers push from arbitrary tasks; only the worker pops. Ordering is
/// strict arrival order: the queue never reorders, which is what lets
/// the dispatcher promise FIFO dispatch across batch boundaries.
///
/// Constructed once at engine startup and injected into both sides, so
/// tests can run against isolated per-test instances.
#[derive(Debug)]
pub struct BatchQueue<T> {
    /// Pending items, head at the front
    items: Mutex<VecDeque<T>>,

    /// Wakes the consumer when an item lands in an empty queue
    available: Notify,
}

impl<T> BatchQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
        }
    }

    /// Appends an item at the tail and wakes the consumer.
    ///
    /// Never fails and never waits beyond the momentary lock. The queue
    /// is unbounded; backpressure is the embedding service's concern.
    pub async fn push(&self, item: T) {
        let mut items = self.items.lock().await;
        items.push_back(item);
        drop(items);
        self.available.notify_one();
    }

    /// Removes and returns the head, suspending until one is available.
    ///
    /// The queue is re-checked before every wait, so a push that races
    /// with the consumer going to sleep is never lost: `Notify` stores
    /// the permit and the next `notified().await` returns immediately.
    pub async fn pop(&self) -> T {
        loop {
            {
                let mut items = self.items.lock().await;
                if let Some(item) = items.pop_front() {
                    return item;
                }
            }
            self.available.notified().await;
        }
    }

    /// Like [`BatchQueue::pop`], but gives up after `duration`.
    ///
    /// Returns `None` on expiry; an empty queue is not an error, it is
    /// how the assembler learns the window closed quietly.
    pub async fn pop_timeout(&self, duration: Duration) -> Option<T> {
        tokio::time::timeout(duration, self.pop()).await.ok()
    }

    /// Number of items currently waiting.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Whether the queue is currently empty.
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

impl<T> Default for BatchQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
