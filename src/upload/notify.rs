use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }
}

/// Fire-and-forget sink for user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

const MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone)]
struct Entry {
    notification: Notification,
    at: Instant,
}

/// Bounded, shareable notification history. The UI shows recent entries as
/// toasts; tests read the full history.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<VecDeque<Entry>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.lock().iter().map(|e| e.notification.clone()).collect()
    }

    /// Notifications younger than `ttl`, oldest first.
    pub fn recent(&self, ttl: Duration) -> Vec<Notification> {
        let now = Instant::now();
        self.lock()
            .iter()
            .filter(|e| now.duration_since(e.at) < ttl)
            .map(|e| e.notification.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => tracing::info!("{}: {}", notification.title, notification.description),
            Severity::Error => tracing::warn!("{}: {}", notification.title, notification.description),
        }
        let mut entries = self.lock();
        entries.push_back(Entry {
            notification,
            at: Instant::now(),
        });
        while entries.len() > MAX_ENTRIES {
            entries.pop_front();
        }
    }
}
