#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde::Serialize;

/// How long a notification stays active before it removes itself.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient, auto-expiring user feedback event.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
}

/// Process-wide queue of transient user feedback.
///
/// Entries expire individually: each push schedules its own removal timer, so
/// one notification disappearing never reorders or disturbs the rest. Ids
/// come from a strictly increasing counter — two pushes in the same instant
/// still get distinct ids.
#[derive(Clone)]
pub struct Notifications {
    inner: Arc<Inner>,
}

struct Inner {
    entries: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
    ttl: Duration,
}

impl Notifications {
    pub fn new() -> Self {
        Self::with_ttl(NOTIFICATION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                ttl,
            }),
        }
    }

    /// Appends an entry and schedules its removal after the TTL.
    /// Returns the entry's id.
    pub fn push(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            message: message.into(),
            kind,
        };
        self.inner.entries.lock().unwrap().push(notification);

        // The timer holds only a weak handle: a torn-down queue must not be
        // kept alive, or written to, by outstanding expiry tasks.
        let ttl = self.inner.ttl;
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = weak.upgrade() {
                inner.entries.lock().unwrap().retain(|n| n.id != id);
            }
        });

        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(message, NotificationKind::Error)
    }

    /// Removes an entry before its timer fires.
    pub fn dismiss(&self, id: u64) {
        self.inner.entries.lock().unwrap().retain(|n| n.id != id);
    }

    /// Snapshot of the active entries in insertion order.
    pub fn active(&self) -> Vec<Notification> {
        self.inner.entries.lock().unwrap().clone()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}
