//! Headless IT desk client: restores the session, loads the dashboard
//! counters and keeps the notification badge in sync until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;

use itdesk_auth::{FileStore, GuardState, HistoryNavigator, Navigator, SessionStore, View, ViewGuard};
use itdesk_client::{
    ApiClient, AppEventBus, ClientConfig, NotificationSynchronizer, NotificationWorker,
    PageVisibility, StatsPanel, SyncOptions,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    itdesk_observability::init();

    let config = ClientConfig::from_env();
    tracing::info!(api = %config.api_base_url, "starting itdesk client");

    let sessions = Arc::new(match config.session_path.clone().or_else(FileStore::default_path) {
        Some(path) => {
            tracing::info!(path = %path.display(), "using persisted session store");
            SessionStore::new(FileStore::new(path))
        }
        None => {
            tracing::warn!("no data directory available; session will not persist");
            SessionStore::in_memory()
        }
    });

    let navigator = Arc::new(HistoryNavigator::starting_at(View::Login));
    let events = Arc::new(AppEventBus::new());
    let api = ApiClient::new(&config, sessions.clone(), navigator.clone())
        .context("failed to build API client")?
        .with_events(events.clone());

    if !sessions.is_authenticated() {
        if let (Ok(email), Ok(password)) = (
            std::env::var("ITDESK_EMAIL"),
            std::env::var("ITDESK_PASSWORD"),
        ) {
            api.login(&email, &password).await.context("login failed")?;
        }
    }

    let mut guard = ViewGuard::for_view(View::LANDING);
    let session = match guard.mount(&sessions, navigator.as_ref()) {
        GuardState::Authorized(session) => session.clone(),
        _ => {
            tracing::warn!("not signed in; set ITDESK_EMAIL and ITDESK_PASSWORD");
            return Ok(());
        }
    };
    navigator.navigate(View::LANDING);

    let role = session.role();
    let menu: Vec<&str> = View::menu_for(role).iter().map(|v| v.path()).collect();
    tracing::info!(user = %session.user.name, %role, role_label = role.label(), ?menu, "dashboard ready");

    let mut stats = StatsPanel::new(api.clone(), role);
    let endpoint = stats.kind().path();
    if let Some(current) = stats.refresh().await {
        let counters = serde_json::Value::Object(current.clone());
        tracing::info!(endpoint, %counters, "stats loaded");
    }

    let visibility = PageVisibility::new();
    let sync = NotificationSynchronizer::new(
        Arc::new(api.clone()),
        sessions.clone(),
        events.clone(),
        SyncOptions::from(&config),
    );
    let worker = NotificationWorker::new(
        sync.clone(),
        &events,
        visibility.subscribe(),
        config.poll_interval,
    )
    .start();

    let mut badge = sync.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
            changed = badge.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = badge.borrow_and_update().clone();
                tracing::info!(
                    unread = state.unread_count,
                    total = state.notifications.len(),
                    "notifications updated"
                );
                if navigator.current() == Some(View::Login) {
                    tracing::warn!("session ended; sign in again");
                    break;
                }
            }
        }
    }

    worker.shutdown().await;
    Ok(())
}
