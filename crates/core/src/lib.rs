//! `itdesk-core` — domain building blocks shared by the client crates.
//!
//! This crate contains **pure domain** primitives (no HTTP, no storage).

pub mod error;
pub mod id;
pub mod notification;

pub use error::{DomainError, DomainResult};
pub use id::{NotificationId, UserId};
pub use notification::{Notification, NotificationKind, count_unread};
