use std::time::Duration;
use thiserror::Error;

/// Error raised by a backend when it cannot produce text for a request.
///
/// The batching layer treats the backend as a black box; all it ever
/// learns about a failure is this description, which it captures into the
/// failing ticket and returns to that ticket's waiter only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerationError {
    message: String,
}

impl GenerationError {
    /// Creates a new error from any printable description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend's description of what went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced to callers of the batching engine.
///
/// The taxonomy deliberately keeps [`BatchError::Timeout`] distinct from
/// [`BatchError::Generation`]: a timed-out caller's request may still
/// complete inside the worker, while a generation failure is final.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The backend failed for this request. Sibling requests in the same
    /// batch are unaffected.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The caller's wait budget elapsed before a result arrived. The
    /// request remains in flight; its eventual result is discarded.
    #[error("no result within {0:?}")]
    Timeout(Duration),

    /// The result channel closed without a value. The engine was shut
    /// down, or the worker recovered from a fault mid-batch.
    #[error("batch worker stopped before completing the request")]
    WorkerStopped,

    /// The background worker could not be started. Fatal: no request can
    /// be served until the engine is rebuilt.
    #[error("failed to start batch worker: {0}")]
    Startup(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BatchError>;
