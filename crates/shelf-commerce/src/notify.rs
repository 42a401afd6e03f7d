//! Transient user notifications.
//!
//! The cart engine and the checkout bridge report user-facing outcomes here
//! and never wait on them. Each notification carries its own lifetime; a
//! surface shows it until the lifetime elapses.

use std::cell::RefCell;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A transient message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    /// How long the message stays visible.
    #[serde(with = "duration_secs")]
    pub ttl: Duration,
}

impl Notification {
    /// Create a notification.
    pub fn new(severity: Severity, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            severity,
            message: message.into(),
            ttl,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

/// Fire-and-forget sink for notifications.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// In-memory notifier that keeps messages until their lifetime elapses.
#[derive(Debug, Default)]
pub struct NotificationTray {
    entries: RefCell<Vec<(Instant, Notification)>>,
}

impl NotificationTray {
    /// Create an empty tray.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages still visible at `now`; expired ones are dismissed.
    pub fn visible_at(&self, now: Instant) -> Vec<Notification> {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|(shown, n)| now.saturating_duration_since(*shown) < n.ttl);
        entries.iter().map(|(_, n)| n.clone()).collect()
    }

    /// Messages still visible now.
    pub fn visible(&self) -> Vec<Notification> {
        self.visible_at(Instant::now())
    }

    /// Take every message regardless of lifetime.
    pub fn drain(&self) -> Vec<Notification> {
        self.entries
            .borrow_mut()
            .drain(..)
            .map(|(_, n)| n)
            .collect()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<Notification> {
        self.entries.borrow().last().map(|(_, n)| n.clone())
    }
}

impl Notifier for NotificationTray {
    fn notify(&self, notification: Notification) {
        let now = Instant::now();
        let mut entries = self.entries.borrow_mut();
        entries.retain(|(shown, n)| now.saturating_duration_since(*shown) < n.ttl);
        entries.push((now, notification));
    }
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => {
                tracing::warn!(message = %notification.message, "user notification")
            }
            _ => tracing::info!(
                severity = %notification.severity,
                message = %notification.message,
                "user notification"
            ),
        }
    }
}
