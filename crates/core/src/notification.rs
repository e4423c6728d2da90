//! Notification record as mirrored from the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::id::NotificationId;

/// Category of a notification.
///
/// Unknown categories coming off the wire collapse into [`NotificationKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Ticket,
    Incident,
    System,
    #[default]
    #[serde(other)]
    Other,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Ticket => "ticket",
            NotificationKind::Incident => "incident",
            NotificationKind::System => "system",
            NotificationKind::Other => "other",
        }
    }
}

impl core::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notification.
///
/// The ticket reference arrives as `ticketId`, `ticket_id` or both, and is
/// exposed through the single canonical [`Notification::ticket_id`] field
/// (`ticketId` wins when both are present).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "NotificationWire")]
pub struct Notification {
    pub id: NotificationId,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    pub title: String,
    pub message: Option<String>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

/// Inbound shape; both ticket spellings are separate keys here.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationWire {
    id: NotificationId,

    #[serde(rename = "type", default)]
    kind: NotificationKind,

    title: String,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    resource_type: Option<String>,

    #[serde(default, deserialize_with = "opt_string_or_number")]
    resource_id: Option<String>,

    #[serde(default)]
    link: Option<String>,

    #[serde(default)]
    is_read: bool,

    created_at: String,

    #[serde(default, rename = "ticketId", deserialize_with = "opt_string_or_number")]
    ticket_id_camel: Option<String>,

    #[serde(default, rename = "ticket_id", deserialize_with = "opt_string_or_number")]
    ticket_id_snake: Option<String>,
}

impl From<NotificationWire> for Notification {
    fn from(wire: NotificationWire) -> Self {
        Self {
            id: wire.id,
            kind: wire.kind,
            title: wire.title,
            message: wire.message,
            resource_type: wire.resource_type,
            resource_id: wire.resource_id,
            link: wire.link,
            is_read: wire.is_read,
            created_at: wire.created_at,
            ticket_id: wire.ticket_id_camel.or(wire.ticket_id_snake),
        }
    }
}

impl Notification {
    /// Ticket this notification points at, if any.
    ///
    /// Falls back to `resourceId` when the resource type is a ticket.
    pub fn ticket_ref(&self) -> Option<&str> {
        if let Some(id) = self.ticket_id.as_deref() {
            return Some(id);
        }
        match self.resource_type.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("ticket") => self.resource_id.as_deref(),
            _ => None,
        }
    }

    /// `createdAt` parsed as RFC 3339, if it is one.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Number of unread notifications in `items`.
pub fn count_unread(items: &[Notification]) -> u64 {
    items.iter().filter(|n| !n.is_read).count() as u64
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
