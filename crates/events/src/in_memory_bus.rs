//! In-memory broadcast bus.

use thiserror::Error;
use tokio::sync::broadcast;

use crate::bus::{EventBus, Subscription};

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InMemoryBusError {
    /// Nobody is subscribed; the message was dropped.
    #[error("no active subscribers")]
    NoSubscribers,
}

/// In-memory pub/sub bus backed by a `tokio` broadcast channel.
///
/// - No IO
/// - Best-effort fan-out
/// - Slow subscribers lag instead of blocking publishers
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    sender: broadcast::Sender<M>,
}

impl<M: Clone> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<M: Clone> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        self.sender
            .send(message)
            .map(|_| ())
            .map_err(|_| InMemoryBusError::NoSubscribers)
    }

    fn subscribe(&self) -> Subscription<M> {
        Subscription::new(self.sender.subscribe())
    }
}
