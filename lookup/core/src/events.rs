//! Surface Events
//!
//! Events sent from a UI surface to the [`crate::Lookup`] controller.
//!
//! Surfaces report what the user did, not what it means. Whether a submit
//! turns into a request, a validation error, or nothing at all is decided in
//! the core.

use serde::{Deserialize, Serialize};

use crate::query::SearchMode;

/// Events from UI surface to the lookup controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    // ============================================
    // Connection Events
    // ============================================
    /// Surface attached; the controller replies with a full snapshot
    Connected,

    /// User asked to leave
    QuitRequested,

    // ============================================
    // Query Composer Events
    // ============================================
    /// User picked a specific mode
    ModeSelected {
        /// The chosen mode
        mode: SearchMode,
    },

    /// User stepped through the mode selector
    ModeCycled {
        /// `true` for next, `false` for previous
        forward: bool,
    },

    /// Input text changed (full replacement, untrimmed)
    InputChanged {
        /// Current text of the input box
        text: String,
    },

    /// User pressed the search button or Enter in the input box
    Submit,

    // ============================================
    // Result Navigation Events
    // ============================================
    /// User opened a list row (absolute index into the full list)
    RowSelected {
        /// Row index
        index: usize,
    },

    /// User left the detail view
    CloseDetail,

    /// Next list page
    NextPage,

    /// Previous list page
    PrevPage,

    /// Jump to a list page
    GoToPage {
        /// 1-based page number
        page: usize,
    },

    // ============================================
    // Notification Events
    // ============================================
    /// User closed the notice
    DismissNotification,

    /// User followed the link inside the notice
    NotificationLinkOpened,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = SurfaceEvent::ModeSelected {
            mode: SearchMode::Ssic,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("SSIC"));

        let back: SurfaceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
