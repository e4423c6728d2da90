use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use itdesk_core::{Notification, NotificationId};

use crate::error::ApiError;
use crate::gateway::ApiClient;

/// Body of `GET /notifications/unread-count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}

/// Backend surface the synchronizer needs.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn list_notifications(&self, limit: usize) -> Result<Vec<Notification>, ApiError>;

    async fn unread_count(&self) -> Result<u64, ApiError>;

    async fn mark_read(&self, id: &NotificationId) -> Result<(), ApiError>;

    async fn mark_all_read(&self) -> Result<(), ApiError>;

    async fn delete_notification(&self, id: &NotificationId) -> Result<(), ApiError>;
}

#[async_trait]
impl NotificationApi for ApiClient {
    async fn list_notifications(&self, limit: usize) -> Result<Vec<Notification>, ApiError> {
        let mut url = self.endpoint(&["notifications"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        let url = self.endpoint(&["notifications", "unread-count"])?;
        let body: UnreadCount = self.get_json(url).await?;
        Ok(body.count)
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<(), ApiError> {
        let url = self.endpoint(&["notifications", id.as_str(), "read"])?;
        self.execute(Method::PUT, url).await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["notifications", "read-all"])?;
        self.execute(Method::PUT, url).await
    }

    async fn delete_notification(&self, id: &NotificationId) -> Result<(), ApiError> {
        let url = self.endpoint(&["notifications", id.as_str()])?;
        self.execute(Method::DELETE, url).await
    }
}
