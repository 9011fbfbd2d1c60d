use std::time::Duration;

/// Tuning knobs for batch assembly and caller waits.
///
/// The embedding service constructs one of these at startup (however it
/// sources the values) and hands it to the engine. Defaults trade at most
/// 10 ms of added latency for the chance to coalesce up to 4 concurrent
/// requests into one backend round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Maximum number of tickets dispatched together. Values of 0 or 1
    /// disable coalescing: every batch holds exactly one ticket.
    pub max_batch_size: usize,

    /// Maximum wall-clock time to keep accumulating a batch, measured
    /// from the moment its first ticket was dequeued. A zero window also
    /// disables coalescing.
    pub max_batch_delay: Duration,

    /// How long a caller waits on its ticket before giving up with a
    /// timeout. The worker still completes the ticket afterwards.
    pub request_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 4,
            max_batch_delay: Duration::from_millis(10),
            request_timeout: Duration::from_secs(300),
        }
    }
}

impl BatchConfig {
    /// Returns the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum batch size.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Sets the assembly window.
    pub fn with_max_batch_delay(mut self, max_batch_delay: Duration) -> Self {
        self.max_batch_delay = max_batch_delay;
        self
    }

    /// Sets the caller-side wait budget.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Whether this configuration can ever produce a batch larger than
    /// one ticket.
    pub fn coalescing_enabled(&self) -> bool {
        self.max_batch_size > 1 && !self.max_batch_delay.is_zero()
    }
}
