//! User-facing notifications emitted by the cart store.

use std::sync::Mutex;
use std::time::Duration;

use tracing::{info, warn};

/// How long error notifications stay visible.
const ERROR_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A short message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// How long the presentation layer should show it.
    pub duration: Duration,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>, millis: u64) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            duration: Duration::from_millis(millis),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            duration: ERROR_DURATION,
        }
    }
}

/// Delivers notifications to whatever shows them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let duration_ms = u64::try_from(notification.duration.as_millis()).unwrap_or(u64::MAX);
        match notification.level {
            NotificationLevel::Success => info!(duration_ms, "{}", notification.message),
            NotificationLevel::Error => warn!(duration_ms, "{}", notification.message),
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let n = Notification::success("Quantity updated", 1500);
        assert_eq!(n.level, NotificationLevel::Success);
        assert_eq!(n.duration, Duration::from_millis(1500));

        let n = Notification::error("Could not add the product");
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(n.duration, ERROR_DURATION);
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success("first", 10));
        notifier.notify(Notification::error("second"));

        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }
}
