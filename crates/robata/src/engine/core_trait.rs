use std::time::Duration;
use async_trait::async_trait;
use crate::backend::GenerationRequest;
use crate::communication::Pending;
use crate::error::{BatchError, Result};

/// Admission contract between request handlers and the batching layer.
///
/// Implemented by [`BatchEngine`]; handlers that want to be testable
/// against a stub admission layer can depend on this trait instead of the
/// concrete engine.
///
/// [`BatchEngine`]: super::BatchEngine
#[async_trait]
pub trait Batcher {
    /// Enqueues a request for batched processing.
    ///
    /// Returns immediately with the [`Pending`] future that resolves when
    /// the worker completes the request. Enqueueing itself never waits on
    /// the backend.
    ///
    /// # Errors
    ///
    /// [`BatchError::WorkerStopped`] if the engine has been shut down.
    async fn submit(&self, request: GenerationRequest) -> Result<Pending>;

    /// Enqueues a request and waits up to `timeout` for its result.
    ///
    /// On expiry the caller gets [`BatchError::Timeout`] and stops
    /// waiting; the request itself stays in flight and the worker's
    /// eventual result is discarded. Timing out is therefore distinct
    /// from [`BatchError::Generation`]: the former may still complete,
    /// the latter definitely failed.
    async fn submit_and_await_with_timeout(
        &self,
        request: GenerationRequest,
        timeout: Duration,
    ) -> Result<String> {
        let pending = self.submit(request).await?;
        match tokio::time::timeout(timeout, pending).await {
            Ok(result) => result,
            Err(_elapsed) => Err(BatchError::Timeout(timeout)),
        }
    }
}
