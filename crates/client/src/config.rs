//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable selecting the backend address.
pub const API_URL_ENV: &str = "ITDESK_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// Path segment every backend route lives under.
pub const API_SEGMENT: &str = "/api";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 100;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// What the notification mirror shows after a failed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailurePolicy {
    /// Drop to an empty list and a zero badge.
    #[default]
    ResetToEmpty,
    /// Keep whatever the last successful refresh produced.
    KeepLastGood,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base, always ending in [`API_SEGMENT`].
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub notification_limit: usize,
    pub fetch_failure_policy: FetchFailurePolicy,
    pub request_timeout: Duration,
    /// Where the session is persisted; `None` picks the platform default.
    pub session_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_base_url: normalize_base_url(api_url),
            poll_interval: DEFAULT_POLL_INTERVAL,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            fetch_failure_policy: FetchFailurePolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            session_path: None,
        }
    }

    /// Read [`API_URL_ENV`], falling back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        let url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(&url)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_notification_limit(mut self, limit: usize) -> Self {
        self.notification_limit = limit;
        self
    }

    pub fn with_fetch_failure_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.fetch_failure_policy = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = Some(path.into());
        self
    }
}

/// Trim trailing slashes and append [`API_SEGMENT`] unless already present.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.ends_with(API_SEGMENT) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{API_SEGMENT}")
    }
}
