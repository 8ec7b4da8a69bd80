//! User-facing notifications
//!
//! Queries and mutations report outcomes through a [`Notifier`] instead of
//! printing, so the CLI, tests and embedders each decide where toasts go.

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Default,
    Destructive,
}

/// A toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    /// Build a notification
    pub fn new(title: impl Into<String>, description: impl Into<String>, variant: Variant) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
        }
    }

    /// "Success" toast
    pub fn success(description: impl Into<String>) -> Self {
        Self::new("Success", description, Variant::Default)
    }

    /// Destructive "Error" toast
    pub fn error(description: impl Into<String>) -> Self {
        Self::new("Error", description, Variant::Destructive)
    }

    /// Whether this reports a failure
    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    fn notify(&self, notification: Notification);
}

/// Emits notifications as tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => tracing::info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            Variant::Destructive => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}

/// Prints notifications to stderr, for the command line
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("[{}] {}", notification.title, notification.description);
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded notifications
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number recorded
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of destructive notifications recorded
    pub fn destructive_count(&self) -> usize {
        self.snapshot().iter().filter(|n| n.is_destructive()).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder() {
        let recorder = RecordingNotifier::new();
        recorder.notify(Notification::success("saved"));
        recorder.notify(Notification::error("boom"));

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.destructive_count(), 1);

        let taken = recorder.take();
        assert_eq!(taken[1].title, "Error");
        assert_eq!(taken[1].to_string(), "Error: boom");
        assert!(recorder.is_empty());
    }
}
