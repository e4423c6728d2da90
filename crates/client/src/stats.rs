//! Role dashboard counters.

use serde_json::{Map, Value};

use itdesk_auth::{Role, StatsKind};

use crate::error::ApiError;
use crate::gateway::ApiClient;

/// Counters as returned by the stats endpoints (shape differs per role).
pub type Stats = Map<String, Value>;

impl ApiClient {
    /// `GET /dashboard/stats`, `/staff/stats` or `/admin/stats`.
    pub async fn stats(&self, kind: StatsKind) -> Result<Stats, ApiError> {
        let segments: Vec<&str> = kind.path().split('/').filter(|s| !s.is_empty()).collect();
        let url = self.endpoint(&segments)?;
        self.get_json(url).await
    }
}

/// Last known counters for one role's dashboard.
///
/// A failed refresh is logged and the previous values stay on display.
#[derive(Debug)]
pub struct StatsPanel {
    api: ApiClient,
    kind: StatsKind,
    current: Option<Stats>,
}

impl StatsPanel {
    pub fn new(api: ApiClient, role: Role) -> Self {
        Self {
            api,
            kind: role.stats_kind(),
            current: None,
        }
    }

    pub fn kind(&self) -> StatsKind {
        self.kind
    }

    pub fn current(&self) -> Option<&Stats> {
        self.current.as_ref()
    }

    /// Integer counter by name, if present.
    pub fn counter(&self, name: &str) -> Option<i64> {
        self.current.as_ref()?.get(name)?.as_i64()
    }

    pub async fn refresh(&mut self) -> Option<&Stats> {
        match self.api.stats(self.kind).await {
            Ok(stats) => {
                self.current = Some(stats);
            }
            Err(err) => {
                tracing::warn!(endpoint = self.kind.path(), "failed to load stats: {err}");
            }
        }
        self.current.as_ref()
    }
}
