//! # Robata
//!
//! An opportunistic **micro-batching** front for slow, stateful inference
//! backends: concurrent requests are grouped into small, time-windowed
//! batches before the backend is invoked, trading a bounded amount of
//! added latency for higher backend throughput.
//!
//! ## Overview
//!
//! This library provides the admission and dispatch layer an HTTP service
//! embeds in front of a generation backend. Independent handler tasks
//! submit work and suspend until their specific result arrives; a single
//! background worker collects the submissions into bounded batches,
//! drives the backend once per item, and fans results back out to each
//! waiting caller.
//!
//! Key components include:
//!
//! - A ticket/completion-signal pair for per-request synchronization
//! - A shared FIFO queue between the many producers and the one consumer
//! - A windowed batch assembler with size and deadline bounds
//! - A resilient dispatch loop with per-item failure isolation
//! - Lock-free counters a diagnostics endpoint can read at any time
//!
//! ## Architecture
//!
//! The batching core stays independent of any specific model runtime.
//! The [`Generator`] trait is the entire backend surface: one async
//! operation producing text for a prompt, failing with a
//! [`GenerationError`]. Everything the engine does (queueing,
//! windowing, completion, accounting) happens around that call.
//!
//! The worker is deliberately singular. When the backend wraps a single
//! accelerator, concurrent callers would only contend for the same
//! device; serializing them behind one consumer is the point, not a
//! limitation. Batch assembly bounds the cost of that choice: a lone
//! request waits at most the configured window (default 10 ms) before it
//! is dispatched alone, while a burst of concurrent requests is coalesced
//! up to the configured size (default 4).
//!
//! ## Usage
//!
//! ```ignore
//! use robata::{BatchConfig, BatchEngine, Batcher, GenerationRequest};
//!
//! // At service startup:
//! let engine = BatchEngine::new(my_model, BatchConfig::default())?;
//!
//! // In each request handler:
//! let text = engine
//!     .submit_and_await(GenerationRequest::new(prompt, 128))
//!     .await?;
//!
//! // In the diagnostics handler:
//! let stats = engine.metrics();
//! ```
//!
//! ## Failure Model
//!
//! A backend failure is captured into the failing request's ticket and
//! returned to that caller only; batch siblings and the worker loop are
//! unaffected. Callers that exhaust their wait budget receive a distinct
//! timeout error while the work itself runs to completion and its result
//! is discarded. An unexpected fault inside the worker is caught at an
//! iteration boundary and logged; the worker keeps serving.

mod communication;
mod core;

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;

pub use backend::{GenerationRequest, Generator};
pub use communication::Pending;
pub use config::BatchConfig;
pub use engine::{BatchEngine, Batcher};
pub use error::{BatchError, GenerationError, Result};
pub use metrics::{BatchMetrics, MetricsSnapshot};
