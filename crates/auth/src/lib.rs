//! `itdesk-auth` — client-side session and authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP. It knows who is signed in
//! (the persisted [`Session`]) and which views and actions each [`Role`] may
//! reach. Enforcement proper belongs to the backend; this is UI gating.

pub mod guard;
pub mod navigation;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod store;
pub mod view;

pub use guard::{GuardState, ViewGuard, check_access};
pub use navigation::{HistoryNavigator, Navigator};
pub use permissions::Action;
pub use roles::{Role, StatsKind};
pub use session::{Session, SessionUser};
pub use store::{FileStore, KeyValueStore, MemoryStore, SessionStore, StoreError};
pub use view::View;
