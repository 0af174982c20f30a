//! Notifications from the notification service.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::errors::MapError;
use crate::model::map;
use crate::util::strip_non_ascii;

/// Target state for marking notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    /// Seen by the user.
    Read,
    /// Not yet seen.
    Unread,
}

impl NotificationStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Unread => "unread",
        }
    }
}

/// One notification record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub(crate) body: String,
    pub(crate) content: String,
    pub(crate) count: i64,
    pub(crate) created: String,
    pub(crate) key: String,
    pub(crate) notif_id: String,
    pub(crate) priority: String,
    pub(crate) reason: String,
    pub(crate) status: String,
    pub(crate) subject: String,
    pub(crate) thing_id: String,
    pub(crate) thing_type: String,
    pub(crate) updated: String,
    pub(crate) reply_id: Option<String>,
}

impl Notification {
    pub(crate) fn from_raw(raw: &Value) -> Result<Self, MapError> {
        Ok(Self {
            body: map::required_str(raw, "body")?,
            content: map::required_stringy(raw, "content")?,
            count: map::required_int(raw, "count")?,
            created: map::required_stringy(raw, "created")?,
            key: map::required_stringy(raw, "key")?,
            notif_id: map::required_stringy(raw, "_id")?,
            priority: map::required_stringy(raw, "priority")?,
            reason: map::required_stringy(raw, "reason")?,
            status: map::required_str(raw, "status")?,
            subject: map::required_str(raw, "subject")?,
            thing_id: map::required_stringy(raw, "thingID")?,
            thing_type: map::required_stringy(raw, "thingType")?,
            updated: map::required_stringy(raw, "updated")?,
            reply_id: map::optional_str(raw, "replyId")?,
        })
    }

    /// Notification body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Content reference, shape depends on [`Self::thing_type`].
    pub fn content(&self) -> &str {
        &self.content
    }

    /// How many events this record aggregates.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Creation timestamp, as received.
    pub fn created(&self) -> &str {
        &self.created
    }

    /// Service-side grouping key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The notification's identity.
    pub fn notif_id(&self) -> &str {
        &self.notif_id
    }

    /// Delivery priority, as received.
    pub fn priority(&self) -> &str {
        &self.priority
    }

    /// Why the notification was generated.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Raw status string (`"read"` / `"unread"`).
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether the status marks this notification as read.
    pub fn is_read(&self) -> bool {
        self.status.eq_ignore_ascii_case("read")
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// ID of the thing the notification is about.
    pub fn thing_id(&self) -> &str {
        &self.thing_id
    }

    /// Kind of the thing the notification is about.
    pub fn thing_type(&self) -> &str {
        &self.thing_type
    }

    /// Last-update timestamp, as received.
    pub fn updated(&self) -> &str {
        &self.updated
    }

    /// Present when the notification points at a specific reply.
    pub fn reply_id(&self) -> Option<&str> {
        self.reply_id.as_deref()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Notification subject: {} ({})\n{}",
            self.subject,
            self.status,
            strip_non_ascii(&self.body)
        )
    }
}
