//! Handler-facing admission layer.
//!
//! An HTTP handler (or any other frontend) holds a shared
//! [`BatchEngine`], calls [`BatchEngine::submit_and_await`] per inbound
//! request, and maps the returned `Result` onto its response schema. The
//! engine owns the queue, the metrics counters, and the single background
//! worker; constructing one at service startup is the whole lifecycle
//! story.

mod batcher;
mod core_trait;

pub use batcher::BatchEngine;
pub use core_trait::Batcher;
