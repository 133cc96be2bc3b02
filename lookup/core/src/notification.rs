//! Notifications
//!
//! The transient notice shown after every search completes, and the timer that
//! hides it. Whether the notice expires on its own is a configuration choice
//! ([`NotificationPolicy`]); when it does, each notice gets exactly one
//! cancellable timer tied to its [`NotificationId`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// Default lifetime of a timed notification
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(3500);

/// Identity of one shown notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl NotificationId {
    /// Allocate a fresh id
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Notification severity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    #[default]
    Info,
    /// Something needs attention
    Warning,
    /// The search failed
    Error,
}

/// A notice on screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Identity, used to match timer expiry
    pub id: NotificationId,
    /// Severity
    pub level: NotifyLevel,
    /// Text shown to the user
    pub message: String,
    /// Optional embedded link; following it dismisses the notice
    pub link: Option<String>,
}

impl Notification {
    /// Create a notification with a fresh id
    pub fn new(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            level,
            message: message.into(),
            link: None,
        }
    }

    /// Attach a link
    #[must_use]
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}

/// How a notification goes away
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationPolicy {
    /// Stays until the user dismisses it
    Persistent,
    /// Hides itself after the given duration
    Timed(Duration),
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self::Timed(DEFAULT_NOTIFICATION_TIMEOUT)
    }
}

impl NotificationPolicy {
    /// Delay before auto-dismissal, if any
    #[must_use]
    pub fn timeout(self) -> Option<Duration> {
        match self {
            Self::Persistent => None,
            Self::Timed(after) => Some(after),
        }
    }
}

/// The single pending auto-dismiss task
///
/// Scheduling replaces (and aborts) whatever was pending, so an older timer can
/// never hide a newer notice. Dropping the timer aborts the task.
#[derive(Debug, Default)]
pub struct DismissTimer {
    pending: Option<(NotificationId, JoinHandle<()>)>,
}

impl DismissTimer {
    /// Create an idle timer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `on_expire(id)` after `after`, cancelling any earlier schedule
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, id: NotificationId, after: Duration, on_expire: F)
    where
        F: FnOnce(NotificationId) + Send + 'static,
    {
        self.cancel();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            on_expire(id);
        });
        self.pending = Some((id, handle));
    }

    /// Abort the pending task, if any
    pub fn cancel(&mut self) {
        if let Some((id, handle)) = self.pending.take() {
            handle.abort();
            tracing::trace!(notification = id.0, "Cancelled dismiss timer");
        }
    }

    /// Id the pending task will expire, if still pending
    #[must_use]
    pub fn pending_id(&self) -> Option<NotificationId> {
        self.pending
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(id, _)| *id)
    }
}

impl Drop for DismissTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
