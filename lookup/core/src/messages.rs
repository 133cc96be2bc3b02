//! Lookup Messages
//!
//! Messages sent from the [`crate::Lookup`] controller to UI surfaces. A
//! surface renders what it is told: the latest state snapshot plus the notice
//! lifecycle.

use serde::{Deserialize, Serialize};

use crate::notification::{Notification, NotificationId, NotifyLevel};
use crate::state::LookupState;

/// Messages from the lookup controller to a UI surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LookupMessage {
    /// Full presentation state after a transition
    State {
        /// Snapshot to render
        snapshot: Box<LookupState>,
    },

    /// Show a notice
    Notify {
        /// Identity, matched by a later `NotifyDismissed`
        id: NotificationId,
        /// Severity
        level: NotifyLevel,
        /// Text
        message: String,
        /// Optional embedded link
        link: Option<String>,
    },

    /// Hide a notice (closed, link followed, or timed out)
    NotifyDismissed {
        /// Notice to hide
        id: NotificationId,
    },

    /// The controller is shutting down
    Quit {
        /// Farewell text
        message: Option<String>,
    },
}

impl LookupMessage {
    /// Snapshot message for `state`
    #[must_use]
    pub fn state(state: &LookupState) -> Self {
        Self::State {
            snapshot: Box::new(state.clone()),
        }
    }

    /// Notify message for `notification`
    #[must_use]
    pub fn notify(notification: &Notification) -> Self {
        Self::Notify {
            id: notification.id,
            level: notification.level,
            message: notification.message.clone(),
            link: notification.link.clone(),
        }
    }
}
