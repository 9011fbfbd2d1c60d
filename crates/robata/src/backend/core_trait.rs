use async_trait::async_trait;
use crate::error::GenerationError;

/// One unit of work handed to the backend.
///
/// Pairs the prompt text with a bound on how many new tokens the backend
/// may produce. Tickets carry a `GenerationRequest` through the queue
/// unchanged; the batching layer never interprets either field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The input prompt.
    prompt: String,

    /// Upper bound on generated tokens. Must be positive; the backend
    /// decides what to do with it.
    max_new_tokens: usize,
}

impl GenerationRequest {
    /// Creates a new request.
    pub fn new(prompt: impl Into<String>, max_new_tokens: usize) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens,
        }
    }

    /// Returns the prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Returns the generation length bound.
    pub fn max_new_tokens(&self) -> usize {
        self.max_new_tokens
    }
}

/// Defines the slow, resource-bound operation fronted by the batching
/// layer.
///
/// Implementations wrap a model runtime, a remote service, or any other
/// text producer. The engine invokes this from a single background worker,
/// one request at a time, so implementations need not support concurrent
/// calls; the worker is the serialization point.
///
/// # Example
///
/// ```ignore
/// use robata::{Generator, GenerationRequest, GenerationError};
/// use async_trait::async_trait;
///
/// struct MyModel {
///     runtime: ModelRuntime,
/// }
///
/// #[async_trait]
/// impl Generator for MyModel {
///     async fn generate(&self, request: &GenerationRequest)
///         -> Result<String, GenerationError>
///     {
///         self.runtime
///             .complete(request.prompt(), request.max_new_tokens())
///             .await
///             .map_err(|e| GenerationError::new(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait Generator: Send + Sync + 'static {
    /// Produces text for one request.
    ///
    /// # Parameters
    ///
    /// * `request` - The prompt and generation bound to run
    ///
    /// # Returns
    ///
    /// The generated text, or a [`GenerationError`] describing why this
    /// single request failed. A failure here is isolated to the request:
    /// the worker keeps processing the rest of the batch.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
