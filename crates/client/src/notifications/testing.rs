//! In-process backend double for synchronizer and worker tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use itdesk_auth::{Role, SessionStore, SessionUser};
use itdesk_core::{Notification, NotificationId, UserId};

use crate::error::ApiError;

use super::api::NotificationApi;

#[derive(Default)]
pub(crate) struct FakeApi {
    pub(crate) items: Mutex<Vec<Notification>>,
    pub(crate) count: Mutex<u64>,
    pub(crate) list_calls: AtomicUsize,
    pub(crate) count_calls: AtomicUsize,
    pub(crate) fail_reads: AtomicBool,
    pub(crate) fail_writes: AtomicBool,
    /// When set, every list call waits for one permit.
    pub(crate) gate: Option<Semaphore>,
}

impl FakeApi {
    pub(crate) fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Default::default()
        }
    }

    pub(crate) fn seed(&self, items: Vec<Notification>, count: u64) {
        *self.items.lock().unwrap() = items;
        *self.count.lock().unwrap() = count;
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn write_result(&self) -> Result<(), ApiError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(ApiError::Status {
                status: 500,
                body: "boom".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationApi for FakeApi {
    async fn list_notifications(&self, limit: usize) -> Result<Vec<Notification>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        let items = self.items.lock().unwrap();
        Ok(items.iter().take(limit).cloned().collect())
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.count.lock().unwrap())
    }

    async fn mark_read(&self, _id: &NotificationId) -> Result<(), ApiError> {
        self.write_result()
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.write_result()
    }

    async fn delete_notification(&self, _id: &NotificationId) -> Result<(), ApiError> {
        self.write_result()
    }
}

pub(crate) fn item(id: &str, is_read: bool) -> Notification {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "type": "ticket",
        "title": format!("notification {id}"),
        "isRead": is_read,
        "createdAt": "2024-03-01T10:00:00Z"
    }))
    .unwrap()
}

pub(crate) fn signed_in() -> Arc<SessionStore> {
    let sessions = SessionStore::in_memory();
    sessions
        .set(
            "t1",
            &SessionUser {
                id: UserId::new(7),
                email: "u@example.com".to_string(),
                name: "U".to_string(),
                role: Role::User,
            },
        )
        .unwrap();
    Arc::new(sessions)
}
