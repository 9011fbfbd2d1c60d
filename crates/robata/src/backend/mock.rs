use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use crate::backend::{GenerationRequest, Generator};
use crate::error::GenerationError;

/// A deterministic backend for tests.
///
/// Echoes prompts back with a marker, sleeping `latency` per call so tests
/// can shape batch timing. Prompts starting with [`MockGenerator::FAIL`]
/// produce a `GenerationError` instead, which lets failure-isolation tests
/// target a single item in a batch.
///
/// The mock also records every prompt in invocation order and tracks how
/// many `generate` calls were ever in flight at once, so tests can assert
/// both FIFO dispatch and the single-worker guarantee.
pub(crate) struct MockGenerator {
    latency: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGenerator {
    /// Prompts with this prefix fail instead of generating.
    pub const FAIL: &'static str = "fail:";

    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Prompts seen so far, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// The largest number of concurrently running `generate` calls.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.calls.lock().unwrap().push(request.prompt().to_string());

        let result = if let Some(reason) = request.prompt().strip_prefix(Self::FAIL) {
            Err(GenerationError::new(reason.trim().to_string()))
        } else {
            Ok(format!("echo: {}", request.prompt()))
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_prompts() {
        let backend = MockGenerator::new();
        let output = backend
            .generate(&GenerationRequest::new("hi", 8))
            .await
            .unwrap();
        assert_eq!(output, "echo: hi");
        assert_eq!(backend.calls(), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn fail_prefix_produces_error() {
        let backend = MockGenerator::new();
        let err = backend
            .generate(&GenerationRequest::new("fail: device lost", 8))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "device lost");
    }
}
