use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use crate::error::{BatchError, Result};
use super::ticket::TicketResult;

/// # Pending
///
/// The awaitable half of a ticket.
///
/// Wraps the oneshot receiver that the worker's [`Ticket::complete`]
/// fires, and flattens the channel's layering into the crate's error
/// taxonomy: a successful send of a backend error resolves to
/// [`BatchError::Generation`], while a closed channel (worker shut down or
/// recovered from a fault before completing this ticket) resolves to
/// [`BatchError::WorkerStopped`].
///
/// [`Ticket::complete`]: super::ticket::Ticket::complete
#[derive(Debug)]
pub struct Pending {
    /// The underlying channel receiver
    receiver: oneshot::Receiver<TicketResult>,
}

impl Pending {
    /// Creates a new `Pending` from a ticket's receiver half.
    pub(crate) fn new(receiver: oneshot::Receiver<TicketResult>) -> Self {
        Self { receiver }
    }
}

impl Future for Pending {
    type Output = Result<String>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().receiver)
            .poll(cx)
            .map(|received| match received {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(generation)) => Err(BatchError::Generation(generation)),
                Err(_closed) => Err(BatchError::WorkerStopped),
            })
    }
}
