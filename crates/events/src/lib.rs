//! `itdesk-events` — in-process pub/sub between client components.
//!
//! Components that change server-side notification state announce it here so
//! every other mounted consumer can refresh.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::AppEvent;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
