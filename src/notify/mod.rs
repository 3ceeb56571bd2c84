//! Notification sink for user-facing toasts.
//!
//! The pane never renders notifications itself; it hands them to a sink. A
//! zero timeout means the notification stays until the user dismisses it.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, info, warn};

/// Default lifetime of transient notifications.
pub const TRANSIENT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Timeout value for notifications that never expire.
pub const PERSISTENT: Duration = Duration::ZERO;

/// Visual intent of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Success,
    Warning,
    Danger,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub intent: Intent,
    pub icon: &'static str,
    pub timeout: Duration,
}

impl Notification {
    /// A transient success toast.
    pub fn success(message: impl Into<String>, timeout: Duration) -> Self {
        Self {
            message: message.into(),
            intent: Intent::Success,
            icon: "tick-circle",
            timeout,
        }
    }

    /// A transient warning toast.
    pub fn warning(message: impl Into<String>, timeout: Duration) -> Self {
        Self {
            message: message.into(),
            intent: Intent::Warning,
            icon: "error",
            timeout,
        }
    }

    /// A danger toast that stays until dismissed.
    pub fn persistent_error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            intent: Intent::Danger,
            icon: "error",
            timeout: PERSISTENT,
        }
    }

    /// Returns true if the toast never expires on its own.
    pub fn is_persistent(&self) -> bool {
        self.timeout.is_zero()
    }
}

/// Where notifications are delivered.
pub trait NotificationSink: Send + Sync {
    fn show(&self, notification: Notification);
}

/// Sink that writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn show(&self, notification: Notification) {
        let timeout_ms = notification.timeout.as_millis() as u64;
        match notification.intent {
            Intent::Success => info!(timeout_ms, "{}", notification.message),
            Intent::Warning => warn!(timeout_ms, "{}", notification.message),
            Intent::Danger => error!(
                persistent = notification.is_persistent(),
                "{}",
                notification.message
            ),
        }
    }
}

/// Sink that keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything shown so far.
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Returns the most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.shown
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .last()
            .cloned()
    }
}

impl NotificationSink for RecordingNotifier {
    fn show(&self, notification: Notification) {
        self.shown
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(notification);
    }
}
