//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is a **distribution** mechanism, not a source of truth: the backend
//! owns notification state, and a missed signal is healed by the next poll.
//!
//! - **Broadcast semantics**: every subscriber gets its own copy of each message
//! - **Best-effort**: a subscriber that falls too far behind observes a lag
//!   error and should treat it as "something changed"
//! - **Async receive**: subscriptions are awaited inside `tokio::select!` loops

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// A subscription to an event stream.
///
/// ```ignore
/// let mut sub = bus.subscribe();
/// loop {
///     match sub.recv().await {
///         Ok(event) => handle(event),
///         Err(RecvError::Lagged(_)) => refresh_everything(),
///         Err(RecvError::Closed) => break,
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: broadcast::Receiver<M>,
}

impl<M: Clone> Subscription<M> {
    pub fn new(receiver: broadcast::Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message.
    pub async fn recv(&mut self) -> Result<M, RecvError> {
        self.receiver.recv().await
    }

    /// Try to receive a message without waiting.
    pub fn try_recv(&mut self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }
}

/// Transport-agnostic event bus.
///
/// Implementations must be safe to share across tasks; publishing never
/// blocks.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
