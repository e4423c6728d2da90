use serde::{Deserialize, Serialize};

/// Signals broadcast between client components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppEvent {
    /// Server-side notification state changed; consumers should refetch.
    NotificationsChanged,

    /// The stored session was cleared (logout or rejected credential).
    SessionCleared,
}

impl AppEvent {
    /// Stable event name (e.g. for logs).
    pub fn event_type(&self) -> &'static str {
        match self {
            AppEvent::NotificationsChanged => "notifications.changed",
            AppEvent::SessionCleared => "session.cleared",
        }
    }
}

impl core::fmt::Display for AppEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.event_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_snake_case() {
        let json = serde_json::to_string(&AppEvent::NotificationsChanged).unwrap();
        assert_eq!(json, "\"notifications_changed\"");
    }
}
