//! # Dispatch Core
//!
//! The single-consumer side of the batching layer: a background worker
//! that drains the shared queue into bounded, time-windowed batches and
//! drives the backend once per ticket.
//!
//! ## Module Structure
//!
//! * [`assembler`] - The windowing algorithm: grow a batch from its first
//!   ticket until the size cap, the window deadline, or a quiet queue ends
//!   assembly.
//!
//! * [`dispatch`] - The worker loop itself: assemble, invoke the backend
//!   per ticket with failure isolation, complete every ticket, record
//!   metrics. A per-iteration recovery boundary keeps a fault in one
//!   iteration from taking the service down.
//!
//! * [`worker`] - Lifecycle handle for the spawned worker task: running
//!   flag, shutdown wakeup, and drop-time cleanup.

pub mod assembler;
pub mod dispatch;
pub mod worker;
