//! Channel plumbing between request handlers and the dispatch worker.
//!
//! A handler turns each inbound request into a [`Ticket`] and keeps the
//! matching [`Pending`] future; the worker pulls tickets out of the shared
//! [`BatchQueue`] and completes them. The oneshot channel inside the pair
//! is the completion signal: it fires exactly once, and carries either the
//! generated text or the backend's error, never both.

mod pending;
mod queue;
mod ticket;

pub use pending::Pending;
pub use queue::BatchQueue;
pub use ticket::{Ticket, TicketResult};
