//! Background task driving notification refreshes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, broadcast::error::RecvError, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use itdesk_events::{AppEvent, EventBus, Subscription};

use crate::gateway::AppEventBus;
use crate::visibility::PageState;

use super::synchronizer::NotificationSynchronizer;

/// Funnels every refresh trigger into [`NotificationSynchronizer::request_refresh`].
///
/// Triggers:
/// - the poll interval
/// - the page becoming visible after being hidden
/// - a `NotificationsChanged` broadcast
/// - [`NotificationSynchronizer::force_refresh`], which also re-arms the timer
///
/// A `SessionCleared` broadcast empties the mirror.
pub struct NotificationWorker {
    sync: NotificationSynchronizer,
    events: Subscription<AppEvent>,
    visibility: watch::Receiver<PageState>,
    poll_interval: Duration,
    shutdown: Arc<Notify>,
}

/// Handle to a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    join: JoinHandle<()>,
    shutdown: Arc<Notify>,
}

impl WorkerHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal shutdown and wait for the task to exit.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        if let Err(err) = self.join.await {
            tracing::error!("notification worker ended abnormally: {err}");
        }
    }
}

impl NotificationWorker {
    /// The bus subscription is taken here, so broadcasts sent between `new`
    /// and the first loop iteration are not lost.
    pub fn new(
        sync: NotificationSynchronizer,
        events: &AppEventBus,
        visibility: watch::Receiver<PageState>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            sync,
            events: events.subscribe(),
            visibility,
            poll_interval,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Mount: one refresh with the loading indicator, then the trigger loop.
    pub fn start(self) -> WorkerHandle {
        let shutdown = self.shutdown.clone();
        let join = tokio::spawn(self.run());
        WorkerHandle { join, shutdown }
    }

    async fn run(self) {
        let NotificationWorker {
            sync,
            mut events,
            mut visibility,
            poll_interval,
            shutdown,
        } = self;

        tracing::info!(interval = ?poll_interval, "notification worker started");

        let mut generation = sync.subscribe_generation();
        generation.borrow_and_update();
        let mut last_shown = visibility.borrow_and_update().shown;

        sync.fetch(true).await;

        let mut poll = tokio::time::interval_at(Instant::now() + poll_interval, poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut bus_open = true;
        let mut visibility_open = true;
        let mut generation_open = true;

        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    tracing::info!("notification worker received shutdown signal");
                    break;
                }
                _ = poll.tick() => {
                    tracing::trace!("poll tick");
                    sync.request_refresh();
                }
                changed = generation.changed(), if generation_open => {
                    if changed.is_err() {
                        generation_open = false;
                        continue;
                    }
                    generation.borrow_and_update();
                    tracing::debug!("forced notification refresh");
                    poll.reset();
                    sync.request_refresh();
                }
                changed = visibility.changed(), if visibility_open => {
                    if changed.is_err() {
                        visibility_open = false;
                        continue;
                    }
                    let shown = visibility.borrow_and_update().shown;
                    if shown != last_shown {
                        tracing::debug!("page visible again; refreshing notifications");
                        sync.request_refresh();
                    }
                    last_shown = shown;
                }
                received = events.recv(), if bus_open => {
                    match received {
                        Ok(AppEvent::NotificationsChanged) => {
                            sync.request_refresh();
                        }
                        Ok(AppEvent::SessionCleared) => sync.reset(),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "event subscription lagged; refreshing");
                            sync.request_refresh();
                        }
                        Err(RecvError::Closed) => {
                            tracing::warn!("event bus closed; broadcast refreshes disabled");
                            bus_open = false;
                        }
                    }
                }
            }
        }

        tracing::info!("notification worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::SyncOptions;
    use crate::notifications::testing::{FakeApi, item, signed_in};
    use crate::visibility::PageVisibility;

    const POLL: Duration = Duration::from_secs(30);

    struct Harness {
        api: Arc<FakeApi>,
        sync: NotificationSynchronizer,
        events: Arc<AppEventBus>,
        page: PageVisibility,
        handle: WorkerHandle,
    }

    async fn started() -> Harness {
        started_on(AppEventBus::new()).await
    }

    async fn started_on(bus: AppEventBus) -> Harness {
        let api = Arc::new(FakeApi::default());
        api.seed(vec![item("n1", false), item("n2", true)], 1);
        let events = Arc::new(bus);
        let sync = NotificationSynchronizer::new(
            api.clone(),
            signed_in(),
            events.clone(),
            SyncOptions::default(),
        );
        let page = PageVisibility::new();
        let handle = NotificationWorker::new(sync.clone(), &events, page.subscribe(), POLL).start();

        wait_for(|| api.list_calls() == 1).await;
        wait_for(|| sync.unread_count() == 1).await;

        Harness {
            api,
            sync,
            events,
            page,
            handle,
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    async fn wait_for(mut cond: impl FnMut() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition not reached");
    }

    #[tokio::test(start_paused = true)]
    async fn mount_loads_then_polls_on_interval() {
        let h = started().await;
        assert_eq!(h.sync.snapshot().notifications.len(), 2);
        assert!(!h.sync.snapshot().loading);

        tokio::time::advance(POLL - Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(h.api.list_calls(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        wait_for(|| h.api.list_calls() == 2).await;

        h.handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn broadcast_triggers_refresh() {
        let h = started().await;

        h.events.publish(AppEvent::NotificationsChanged).unwrap();
        wait_for(|| h.api.list_calls() == 2).await;

        // Local mutations broadcast too, so they are reconciled right away.
        h.sync.mark_as_read(&"n1".into()).await.unwrap();
        wait_for(|| h.api.list_calls() == 3).await;

        h.handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn returning_to_view_triggers_refresh() {
        let h = started().await;

        h.page.set_hidden();
        settle().await;
        assert_eq!(h.api.list_calls(), 1);

        h.page.set_visible();
        wait_for(|| h.api.list_calls() == 2).await;

        h.handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn hide_and_show_between_polls_of_the_worker_still_refreshes() {
        let h = started().await;

        h.page.set_hidden();
        h.page.set_visible();
        wait_for(|| h.api.list_calls() == 2).await;

        h.handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn lagged_subscription_counts_as_a_change() {
        let h = started_on(AppEventBus::with_capacity(1)).await;

        // Only SessionCleared is sent, so the refresh can only come from the lag.
        for _ in 0..3 {
            h.events.publish(AppEvent::SessionCleared).unwrap();
        }
        wait_for(|| h.api.list_calls() == 2).await;

        h.handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn force_refresh_fetches_now_and_rearms_timer() {
        let h = started().await;

        tokio::time::advance(Duration::from_secs(20)).await;
        settle().await;
        h.sync.force_refresh();
        wait_for(|| h.api.list_calls() == 2).await;

        // The original deadline (30s after mount) passes without a tick.
        tokio::time::advance(Duration::from_secs(20)).await;
        settle().await;
        assert_eq!(h.api.list_calls(), 2);

        tokio::time::advance(Duration::from_secs(10)).await;
        wait_for(|| h.api.list_calls() == 3).await;

        h.handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn session_cleared_empties_mirror() {
        let h = started().await;

        h.events.publish(AppEvent::SessionCleared).unwrap();
        wait_for(|| h.sync.snapshot().is_empty()).await;
        assert_eq!(h.sync.unread_count(), 0);

        h.handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_polling() {
        let h = started().await;
        h.handle.shutdown().await;

        tokio::time::advance(POLL * 3).await;
        settle().await;
        assert_eq!(h.api.list_calls(), 1);
    }
}
