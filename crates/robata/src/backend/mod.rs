//! # Generation Backend
//!
//! This module defines the seam between the batching layer and the slow,
//! stateful backend that actually produces text.
//!
//! The batching core never looks inside the backend: it consumes exactly
//! one operation, [`Generator::generate`], and assumes the implementation
//! serializes access to whatever device or process it wraps. The single
//! dispatch worker guarantees calls arrive sequentially, so a backend that
//! is merely safe under one-at-a-time invocation is sufficient.

mod core_trait;

// Re-export the trait and request type for convenient imports
pub use core_trait::*;

#[cfg(test)]
/// Mock generator implementation.
///
/// Deterministic echo backend with configurable latency and failures.
pub(crate) mod mock;
