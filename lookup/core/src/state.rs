//! Presentation State Machine
//!
//! All screen state lives in one [`LookupState`] and changes only through
//! [`update`], a synchronous reducer that takes an [`Action`] and returns the
//! [`Effect`]s the caller must carry out (network calls, timers). Nothing in
//! here performs I/O, so every transition can be exercised without a runtime.
//!
//! ```text
//! Idle ──Submit──► Loading ──SearchCompleted──► Error | Single | Aggregate | List
//!   ▲                 │                                                    │
//!   └──── (next Submit from any state) ◄──────────────────────────────────┘
//!
//! List ──SelectRow──► List{detail: Loading} ──DetailCompleted──► List{detail: Loaded}
//!                                   └── failure: back to List{detail: None}, logged only
//! ```
//!
//! # Stale responses
//!
//! Each submit bumps `search_generation`; each row selection bumps
//! `detail_generation`. A completion is applied only if it carries the
//! current generation, so a slow response can never overwrite newer state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::classify;
use crate::error::LookupError;
use crate::notification::{Notification, NotificationId, NotificationPolicy, NotifyLevel};
use crate::pagination::{Pagination, DEFAULT_PAGE_SIZE};
use crate::query::{SearchMode, SearchQuery};
use crate::record::{AggregateResult, BusinessRecord, ResultTag, SearchResult};

/// Default text of the post-search notice
pub const DEFAULT_NOTICE: &str =
    "Results are sourced from the public business registry. Check the registry for the latest filings.";

/// Token tying a completion to the request that produced it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    fn bump(&mut self) -> Self {
        self.0 += 1;
        *self
    }
}

/// Settings the reducer needs
#[derive(Clone, Debug)]
pub struct ReducerConfig {
    /// Rows per list page
    pub page_size: usize,
    /// How notices are dismissed
    pub notification_policy: NotificationPolicy,
    /// Text shown after every search
    pub notice: String,
    /// Optional link embedded in the notice
    pub notice_link: Option<String>,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            notification_policy: NotificationPolicy::default(),
            notice: DEFAULT_NOTICE.to_string(),
            notice_link: None,
        }
    }
}

/// Drill-down sub-state of a list result
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailState {
    /// List is shown
    #[default]
    None,
    /// Fetching the full record for a row
    Loading {
        /// Identifier being fetched
        uen: String,
    },
    /// Full record for a row
    Loaded(BusinessRecord),
}

/// What the main pane shows
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    /// Nothing searched yet
    #[default]
    Idle,
    /// Search in flight
    Loading,
    /// Search failed; the message is shown verbatim
    Error(String),
    /// One record
    Single {
        /// The record
        record: BusinessRecord,
        /// `Single` or `SingleFromList`
        tag: ResultTag,
    },
    /// Count for a classification code
    Aggregate(AggregateResult),
    /// Paginated list of records
    List {
        /// Every fetched record
        records: Vec<BusinessRecord>,
        /// Drill-down sub-state
        detail: DetailState,
    },
}

impl View {
    /// Short label for the status bar
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Loading => "Searching...",
            Self::Error(_) => "Error",
            Self::Single { .. } => "Result",
            Self::Aggregate(_) => "Summary",
            Self::List {
                detail: DetailState::Loading { .. },
                ..
            } => "Loading details...",
            Self::List {
                detail: DetailState::Loaded(_),
                ..
            } => "Details",
            Self::List { .. } => "Results",
        }
    }

    fn from_result(result: SearchResult) -> Self {
        let tag = result.tag();
        match result {
            SearchResult::Single(record) | SearchResult::SingleFromList(record) => {
                Self::Single { record, tag }
            }
            SearchResult::Aggregate(aggregate) => Self::Aggregate(aggregate),
            SearchResult::List(records) => Self::List {
                records,
                detail: DetailState::None,
            },
        }
    }
}

/// Inputs to the reducer
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Pick a search mode
    SelectMode(SearchMode),
    /// Move the mode selector forward or back
    CycleMode {
        /// `true` for next, `false` for previous
        forward: bool,
    },
    /// Replace the input text
    SetInput(String),
    /// Submit the current mode and input
    Submit,
    /// A search request finished
    SearchCompleted {
        /// Generation the request was issued under
        generation: Generation,
        /// Raw payload or transport/status error
        outcome: Result<Value, LookupError>,
    },
    /// Drill into a list row (absolute index into the full list)
    SelectRow(usize),
    /// A drill-down request finished
    DetailCompleted {
        /// Generation the request was issued under
        generation: Generation,
        /// Raw payload or transport/status error
        outcome: Result<Value, LookupError>,
    },
    /// Leave the detail view and return to the list
    CloseDetail,
    /// Next list page
    NextPage,
    /// Previous list page
    PrevPage,
    /// Jump to a list page (1-based)
    GoToPage(usize),
    /// Close the notice
    DismissNotification,
    /// Follow the link embedded in the notice
    FollowNotificationLink,
    /// The notice's timer ran out
    NotificationExpired(NotificationId),
}

/// Work the caller must perform after a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Abort whatever search or drill-down is still running
    CancelInFlight,
    /// Run a search
    Search {
        /// Generation to report back with
        generation: Generation,
        /// Query to send
        query: SearchQuery,
    },
    /// Fetch one record by identifier
    FetchDetail {
        /// Generation to report back with
        generation: Generation,
        /// Identifier query
        query: SearchQuery,
    },
    /// Start the auto-dismiss timer for a notice
    ScheduleDismiss {
        /// Notice to dismiss
        id: NotificationId,
        /// Delay
        after: Duration,
    },
    /// Stop any pending auto-dismiss timer
    CancelDismiss,
    /// Open the notice's link
    OpenLink(String),
}

/// The complete presentation state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupState {
    /// Selected search mode
    pub mode: SearchMode,
    /// Current input text (untrimmed)
    pub input: String,
    /// Main pane
    pub view: View,
    /// Page position within a list result
    pub pagination: Pagination,
    /// Notice, if one is showing
    pub notification: Option<Notification>,
    /// Generation of the latest search
    pub search_generation: Generation,
    /// Generation of the latest drill-down
    pub detail_generation: Generation,
    /// Query of the latest dispatched search
    pub last_query: Option<SearchQuery>,
}

impl Default for LookupState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl LookupState {
    /// Idle state with the given page size
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            mode: SearchMode::default(),
            input: String::new(),
            view: View::Idle,
            pagination: Pagination::new(page_size),
            notification: None,
            search_generation: Generation::default(),
            detail_generation: Generation::default(),
            last_query: None,
        }
    }

    /// Whether a search is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.view, View::Loading)
    }

    /// Error message being shown, if any
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.view {
            View::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Full list of a list result
    #[must_use]
    pub fn records(&self) -> Option<&[BusinessRecord]> {
        match &self.view {
            View::List { records, .. } => Some(records),
            _ => None,
        }
    }

    /// Rows of the current page of a list result
    #[must_use]
    pub fn page_records(&self) -> Option<&[BusinessRecord]> {
        self.records().map(|records| self.pagination.slice(records))
    }

    /// Pages in the current list result (0 when not a list)
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.records()
            .map_or(0, |records| self.pagination.total_pages(records.len()))
    }

    /// Drill-down sub-state, when a list is shown
    #[must_use]
    pub fn detail(&self) -> Option<&DetailState> {
        match &self.view {
            View::List { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// Apply `action` to `state`, returning the effects to run
pub fn update(state: &mut LookupState, action: Action, config: &ReducerConfig) -> Vec<Effect> {
    match action {
        Action::SelectMode(mode) => {
            state.mode = mode;
            Vec::new()
        }
        Action::CycleMode { forward } => {
            state.mode = if forward {
                state.mode.next()
            } else {
                state.mode.prev()
            };
            Vec::new()
        }
        Action::SetInput(text) => {
            state.input = text;
            Vec::new()
        }
        Action::Submit => submit(state),
        Action::SearchCompleted {
            generation,
            outcome,
        } => search_completed(state, generation, outcome, config),
        Action::SelectRow(index) => select_row(state, index),
        Action::DetailCompleted {
            generation,
            outcome,
        } => {
            detail_completed(state, generation, outcome);
            Vec::new()
        }
        Action::CloseDetail => {
            if let View::List { detail, .. } = &mut state.view {
                if !matches!(detail, DetailState::None) {
                    *detail = DetailState::None;
                    state.detail_generation.bump();
                }
            }
            Vec::new()
        }
        Action::NextPage => {
            if let Some(len) = state.records().map(<[BusinessRecord]>::len) {
                state.pagination.next(len);
            }
            Vec::new()
        }
        Action::PrevPage => {
            if state.records().is_some() {
                state.pagination.prev();
            }
            Vec::new()
        }
        Action::GoToPage(page) => {
            if let Some(len) = state.records().map(<[BusinessRecord]>::len) {
                state.pagination.go_to(page, len);
            }
            Vec::new()
        }
        Action::DismissNotification => {
            if state.notification.take().is_some() {
                vec![Effect::CancelDismiss]
            } else {
                Vec::new()
            }
        }
        Action::FollowNotificationLink => match state.notification.take() {
            Some(Notification {
                link: Some(link), ..
            }) => vec![Effect::CancelDismiss, Effect::OpenLink(link)],
            Some(_) => vec![Effect::CancelDismiss],
            None => Vec::new(),
        },
        Action::NotificationExpired(id) => {
            match &state.notification {
                Some(current) if current.id == id => state.notification = None,
                _ => tracing::debug!(notification = id.0, "Ignoring stale notification expiry"),
            }
            Vec::new()
        }
    }
}

fn submit(state: &mut LookupState) -> Vec<Effect> {
    let was_loading = state.is_loading();
    // Any in-flight work is superseded by this submit, valid or not
    state.search_generation.bump();
    state.detail_generation.bump();
    let mut effects = if was_loading {
        vec![Effect::CancelInFlight]
    } else {
        Vec::new()
    };

    match SearchQuery::compose(state.mode, &state.input) {
        Ok(query) => {
            state.view = View::Loading;
            state.pagination.reset();
            state.last_query = Some(query.clone());
            if !was_loading {
                effects.push(Effect::CancelInFlight);
            }
            effects.push(Effect::Search {
                generation: state.search_generation,
                query,
            });
        }
        Err(err) => {
            state.view = View::Error(err.user_message());
        }
    }
    effects
}

fn search_completed(
    state: &mut LookupState,
    generation: Generation,
    outcome: Result<Value, LookupError>,
    config: &ReducerConfig,
) -> Vec<Effect> {
    if generation != state.search_generation || !state.is_loading() {
        tracing::debug!(
            generation = generation.0,
            current = state.search_generation.0,
            "Discarding stale search response"
        );
        return Vec::new();
    }

    let mode = state
        .last_query
        .as_ref()
        .map_or(state.mode, SearchQuery::mode);

    let classified = outcome.and_then(|payload| classify(&payload, mode));
    let level = match classified {
        Ok(result) => {
            state.view = View::from_result(result);
            NotifyLevel::Info
        }
        Err(err) => {
            tracing::debug!(kind = err.kind(), "Search failed");
            state.view = View::Error(err.user_message());
            if err == LookupError::NotFound {
                NotifyLevel::Warning
            } else {
                NotifyLevel::Error
            }
        }
    };

    let notification =
        Notification::new(level, config.notice.clone()).with_link(config.notice_link.clone());
    let id = notification.id;
    state.notification = Some(notification);

    match config.notification_policy.timeout() {
        Some(after) => vec![Effect::ScheduleDismiss { id, after }],
        None => vec![Effect::CancelDismiss],
    }
}

fn select_row(state: &mut LookupState, index: usize) -> Vec<Effect> {
    let View::List { records, detail } = &mut state.view else {
        return Vec::new();
    };
    let Some(record) = records.get(index) else {
        tracing::debug!(index, len = records.len(), "Row selection out of range");
        return Vec::new();
    };

    let query = match SearchQuery::detail(&record.uen) {
        Ok(query) => query,
        Err(_) => {
            tracing::warn!(index, "Selected row has no identifier");
            return Vec::new();
        }
    };

    *detail = DetailState::Loading {
        uen: query.text().to_string(),
    };
    vec![Effect::FetchDetail {
        generation: state.detail_generation.bump(),
        query,
    }]
}

fn detail_completed(
    state: &mut LookupState,
    generation: Generation,
    outcome: Result<Value, LookupError>,
) {
    let current = state.detail_generation;
    let View::List { detail, .. } = &mut state.view else {
        tracing::debug!(generation = generation.0, "Discarding detail response outside list");
        return;
    };
    if generation != current || !matches!(detail, DetailState::Loading { .. }) {
        tracing::debug!(
            generation = generation.0,
            current = current.0,
            "Discarding stale detail response"
        );
        return;
    }

    match outcome.and_then(|payload| classify(&payload, SearchMode::Uen)) {
        Ok(SearchResult::Single(record) | SearchResult::SingleFromList(record)) => {
            *detail = DetailState::Loaded(record);
        }
        Ok(other) => {
            tracing::warn!(tag = ?other.tag(), "Detail lookup returned a non-record shape");
            *detail = DetailState::None;
        }
        Err(err) => {
            tracing::warn!(error = %err, kind = err.kind(), "Detail lookup failed");
            *detail = DetailState::None;
        }
    }
}
