//! Local mirror of server-side notification state.
//!
//! - [`NotificationSynchronizer`] owns the list and unread count and is the
//!   only writer; consumers get a read-only `watch` receiver
//! - [`NotificationWorker`] funnels every refresh trigger (poll timer, page
//!   visibility, bus broadcast, forced refresh) into one entry point

mod api;
mod state;
mod synchronizer;
mod worker;

#[cfg(test)]
mod testing;

pub use api::{NotificationApi, UnreadCount};
pub use state::NotificationState;
pub use synchronizer::{NotificationSynchronizer, SyncOptions};
pub use worker::{NotificationWorker, WorkerHandle};
