//! `itdesk-client`
//!
//! **Responsibility:** the stateful half of the IT support desk client.
//!
//! This crate provides:
//! - The API gateway (bearer injection, session teardown on 401)
//! - Typed backend endpoints (login, notifications, role dashboards)
//! - The notification synchronizer and its polling worker
//!
//! The backend stays the authority; everything here is a local mirror.

pub mod config;
pub mod error;
pub mod gateway;
pub mod notifications;
pub mod stats;
pub mod visibility;

pub use config::{ClientConfig, FetchFailurePolicy};
pub use error::ApiError;
pub use gateway::{ApiClient, AppEventBus};
pub use notifications::{
    NotificationApi, NotificationState, NotificationSynchronizer, NotificationWorker, SyncOptions,
    WorkerHandle,
};
pub use stats::{Stats, StatsPanel};
pub use visibility::{PageState, PageVisibility, Visibility};
