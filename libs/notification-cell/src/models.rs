// libs/notification-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    General,
    Budget,
    Appointment,
    Patient,
}

/// Patient identity captured by value at record time. Later edits to the
/// patient record never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub name: String,
    pub nif: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl PatientSnapshot {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nif: None,
            email: None,
            phone: None,
        }
    }
}

/// A single event in the append-only feed. Entries are only ever flagged,
/// never removed: `visible` drives the transient toast, `dismissed_from_bell`
/// permanently hides the entry from the bell dropdown, and the full log stays
/// queryable as the audit history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub visible: bool,
    pub dismissed_from_bell: bool,
    pub kind: NotificationKind,
    pub category: NotificationCategory,
    pub patient: Option<PatientSnapshot>,
}

/// One-line header ticker reflecting the newest event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    pub message: String,
    pub category: NotificationCategory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    pub search: Option<String>,
    pub kind: Option<NotificationKind>,
}
