use tokio::sync::oneshot;
use uuid::Uuid;
use crate::backend::GenerationRequest;
use crate::error::GenerationError;
use super::pending::Pending;

/// What the worker writes into a ticket: generated text on success, the
/// backend's error on failure. Exactly one of the two, by construction.
pub type TicketResult = Result<String, GenerationError>;

/// One caller's pending request as it travels through the queue.
///
/// A `Ticket` pairs the request payload with the sending half of a oneshot
/// channel. The handler that created it holds the matching [`Pending`];
/// after enqueueing, the worker is the only party that can touch the
/// result slot, and [`Ticket::complete`] consumes the ticket so the signal
/// cannot fire twice.
///
/// Tickets are created per inbound request and discarded once completed;
/// they never outlive one request/response cycle.
#[derive(Debug)]
pub struct Ticket {
    /// Unique identifier, used to correlate log lines for this request
    id: Uuid,

    /// The prompt and generation bound to run
    request: GenerationRequest,

    /// Completion signal and result slot, single-fire
    sender: oneshot::Sender<TicketResult>,
}

impl Ticket {
    /// Creates a ticket and the future its originator will await.
    ///
    /// # Parameters
    ///
    /// * `request` - The work this ticket represents
    ///
    /// # Returns
    ///
    /// The ticket (to be enqueued) and the [`Pending`] future that
    /// resolves when the worker completes it.
    pub fn new(request: GenerationRequest) -> (Self, Pending) {
        let (tx, rx) = oneshot::channel();
        let ticket = Self {
            id: Uuid::new_v4(),
            request,
            sender: tx,
        };
        (ticket, Pending::new(rx))
    }

    /// Returns this ticket's unique identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the request this ticket carries.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Writes the result and fires the completion signal.
    ///
    /// Consuming `self` is what makes the exactly-once guarantee hold: a
    /// completed ticket no longer exists. If the originating handler
    /// already gave up waiting, the result has nowhere to go and is
    /// dropped; that is the accepted cost of not cancelling in-flight
    /// work.
    pub fn complete(self, result: TicketResult) {
        if self.sender.send(result).is_err() {
            tracing::debug!(ticket = %self.id, "result discarded; waiter already gone");
        }
    }
}
