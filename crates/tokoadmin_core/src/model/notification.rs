//! Transient notification model.
//!
//! # Invariants
//! - A notification lives at most `ttl_ms` after `created_at_ms`.
//! - Ids are unique within one notification center.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the notification center at creation time.
pub type NotificationId = i64;

/// Severity used by the presentation layer to pick styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Caller-supplied notification content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl NotificationPayload {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }
}

/// Retained notification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(flatten)]
    pub payload: NotificationPayload,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
    pub ttl_ms: i64,
}

impl Notification {
    /// Absolute time at which the entry is removed automatically.
    pub fn expires_at_ms(&self) -> i64 {
        self.created_at_ms.saturating_add(self.ttl_ms)
    }
}
