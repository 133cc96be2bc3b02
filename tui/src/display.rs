//! Display State
//!
//! What the TUI renders, rebuilt purely from [`LookupMessage`]s. The only
//! things owned here rather than in the core are the list cursor and the
//! toast copy, both of which are presentation details.

use bizlookup_core::{
    BusinessRecord, DetailState, LookupMessage, LookupState, NotificationId, NotifyLevel, View,
};

/// The toast currently on screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayToast {
    /// Matches the controller's notice
    pub id: NotificationId,
    /// Severity, picks the border colour
    pub level: NotifyLevel,
    /// Body text
    pub message: String,
    /// Link the `o` key follows
    pub link: Option<String>,
}

/// Render-side state
#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    /// Latest snapshot from the controller
    pub snapshot: LookupState,
    /// Visible toast
    pub toast: Option<DisplayToast>,
    /// Highlighted row within the current list page
    pub cursor: usize,
    /// Controller has shut down
    pub quitting: bool,
    /// Farewell text printed after the terminal is restored
    pub goodbye: Option<String>,
}

impl DisplayState {
    /// Fresh display with nothing searched
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one controller message
    pub fn apply_message(&mut self, msg: LookupMessage) {
        match msg {
            LookupMessage::State { snapshot } => {
                let new_list = snapshot.search_generation != self.snapshot.search_generation
                    || snapshot.pagination.current_page() != self.snapshot.pagination.current_page();
                self.snapshot = *snapshot;
                if new_list {
                    self.cursor = 0;
                }
                self.clamp_cursor();
            }
            LookupMessage::Notify {
                id,
                level,
                message,
                link,
            } => {
                self.toast = Some(DisplayToast {
                    id,
                    level,
                    message,
                    link,
                });
            }
            LookupMessage::NotifyDismissed { id } => {
                if self.toast.as_ref().is_some_and(|t| t.id == id) {
                    self.toast = None;
                }
            }
            LookupMessage::Quit { message } => {
                self.quitting = true;
                self.goodbye = message;
            }
        }
    }

    /// Rows of the current list page (empty when no list is shown)
    pub fn page_rows(&self) -> &[BusinessRecord] {
        self.snapshot.page_records().unwrap_or(&[])
    }

    /// Whether the list table itself is on screen (not a detail pane)
    pub fn list_visible(&self) -> bool {
        matches!(
            self.snapshot.view,
            View::List {
                detail: DetailState::None,
                ..
            }
        )
    }

    /// Whether a drill-down is loading or shown
    pub fn detail_open(&self) -> bool {
        matches!(self.snapshot.detail(), Some(d) if *d != DetailState::None)
    }

    /// Absolute index of the highlighted row
    pub fn selected_index(&self) -> Option<usize> {
        if !self.list_visible() || self.page_rows().is_empty() {
            return None;
        }
        let page = &self.snapshot.pagination;
        Some((page.current_page() - 1) * page.page_size() + self.cursor)
    }

    /// Move the cursor up; returns false if it was already on the first row
    pub fn cursor_up(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move the cursor down, stopping at the last row of the page
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.page_rows().len() {
            self.cursor += 1;
        }
    }

    /// Text for the left side of the status bar
    pub fn status_text(&self) -> String {
        let phase = self.snapshot.view.label();
        match self.snapshot.records() {
            Some(records) => format!(
                "{phase} | {} found | Page {} of {}",
                records.len(),
                self.snapshot.pagination.current_page(),
                self.snapshot.total_pages().max(1)
            ),
            None => format!("{phase} | {}", self.snapshot.mode.label()),
        }
    }

    fn clamp_cursor(&mut self) {
        let rows = self.page_rows().len();
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
    }
}
