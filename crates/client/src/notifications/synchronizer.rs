use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use itdesk_auth::SessionStore;
use itdesk_core::NotificationId;
use itdesk_events::{AppEvent, EventBus};

use crate::config::{ClientConfig, FetchFailurePolicy};
use crate::error::ApiError;
use crate::gateway::AppEventBus;

use super::api::NotificationApi;
use super::state::NotificationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Upper bound on list size per refresh.
    pub limit: usize,
    pub failure_policy: FetchFailurePolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for SyncOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            limit: config.notification_limit,
            failure_policy: config.fetch_failure_policy,
        }
    }
}

/// Owner of the notification mirror.
///
/// Cheap to clone; all clones share one state. Consumers read through
/// [`NotificationSynchronizer::subscribe`] and change state only through the
/// mutation methods here.
#[derive(Clone)]
pub struct NotificationSynchronizer {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn NotificationApi>,
    sessions: Arc<SessionStore>,
    events: Arc<AppEventBus>,
    options: SyncOptions,
    state: watch::Sender<NotificationState>,
    in_flight: AtomicBool,
    generation: watch::Sender<u64>,
}

/// Holds the in-flight flag; releases it on drop, whatever the exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl core::fmt::Debug for NotificationSynchronizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationSynchronizer")
            .field("options", &self.inner.options)
            .field("in_flight", &self.is_fetching())
            .finish_non_exhaustive()
    }
}

impl NotificationSynchronizer {
    pub fn new(
        api: Arc<dyn NotificationApi>,
        sessions: Arc<SessionStore>,
        events: Arc<AppEventBus>,
        options: SyncOptions,
    ) -> Self {
        let (state, _) = watch::channel(NotificationState::default());
        let (generation, _) = watch::channel(0);

        Self {
            inner: Arc::new(Inner {
                api,
                sessions,
                events,
                options,
                state,
                in_flight: AtomicBool::new(false),
                generation,
            }),
        }
    }

    /// Read-only view that is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> NotificationState {
        self.inner.state.borrow().clone()
    }

    pub fn unread_count(&self) -> u64 {
        self.inner.state.borrow().unread_count
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Refresh from the backend.
    ///
    /// At most one refresh runs at a time; a call that overlaps a running one
    /// returns immediately without touching the network.
    pub async fn fetch(&self, show_loading: bool) {
        if !self.inner.sessions.is_authenticated() {
            self.reset();
            return;
        }

        let Some(_in_flight) = InFlight::acquire(&self.inner.in_flight) else {
            tracing::debug!("notification refresh already in flight; skipping");
            return;
        };

        if show_loading {
            self.inner.state.send_modify(|s| s.loading = true);
        }

        let api = &self.inner.api;
        let result = tokio::try_join!(
            api.list_notifications(self.inner.options.limit),
            api.unread_count()
        );

        match result {
            Ok((notifications, unread_count)) => {
                tracing::debug!(
                    total = notifications.len(),
                    unread = unread_count,
                    "notifications refreshed"
                );
                self.inner
                    .state
                    .send_replace(NotificationState::new(notifications, unread_count));
            }
            Err(err) => {
                tracing::warn!("notification refresh failed: {err}");
                match self.inner.options.failure_policy {
                    FetchFailurePolicy::ResetToEmpty => {
                        self.inner.state.send_replace(NotificationState::default());
                    }
                    FetchFailurePolicy::KeepLastGood => {
                        self.inner.state.send_modify(|s| s.loading = false);
                    }
                }
            }
        }
    }

    /// Start a background refresh without a loading indicator.
    pub fn request_refresh(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.fetch(false).await })
    }

    /// Ask the worker for an immediate refresh outside the poll cadence.
    pub fn force_refresh(&self) {
        self.inner.generation.send_modify(|g| *g = g.wrapping_add(1));
    }

    pub fn refresh_generation(&self) -> u64 {
        *self.inner.generation.borrow()
    }

    pub(crate) fn subscribe_generation(&self) -> watch::Receiver<u64> {
        self.inner.generation.subscribe()
    }

    /// Empty the mirror (signed out).
    pub fn reset(&self) {
        self.inner.state.send_if_modified(|s| {
            if *s == NotificationState::default() {
                return false;
            }
            *s = NotificationState::default();
            true
        });
    }

    /// Mark one notification read.
    ///
    /// On failure nothing changes locally and nothing is broadcast.
    pub async fn mark_as_read(&self, id: &NotificationId) -> Result<(), ApiError> {
        if let Err(err) = self.inner.api.mark_read(id).await {
            tracing::warn!(id = %id, "failed to mark notification read: {err}");
            return Err(err);
        }

        self.inner.state.send_modify(|s| {
            s.mark_read(id);
        });
        self.broadcast_changed();
        Ok(())
    }

    pub async fn mark_all_as_read(&self) -> Result<(), ApiError> {
        if let Err(err) = self.inner.api.mark_all_read().await {
            tracing::warn!("failed to mark all notifications read: {err}");
            return Err(err);
        }

        self.inner.state.send_modify(NotificationState::mark_all_read);
        self.broadcast_changed();
        Ok(())
    }

    /// Delete one notification. Failure is returned and leaves state as is.
    pub async fn delete_notification(&self, id: &NotificationId) -> Result<(), ApiError> {
        let was_unread = self.inner.state.borrow().is_unread(id);

        self.inner.api.delete_notification(id).await?;

        self.inner.state.send_modify(|s| s.remove(id, was_unread));
        self.broadcast_changed();
        Ok(())
    }

    fn broadcast_changed(&self) {
        if self.inner.events.publish(AppEvent::NotificationsChanged).is_err() {
            tracing::debug!("no listeners for notification change");
        }
    }
}
