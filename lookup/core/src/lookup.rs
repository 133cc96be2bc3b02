//! Lookup Controller
//!
//! Headless driver for the presentation state machine. It turns
//! [`SurfaceEvent`]s into reducer [`Action`]s, carries out the resulting
//! [`Effect`]s, and tells the surface what changed.
//!
//! # Architecture
//!
//! ```text
//! SurfaceEvent ──► handle_event ──► update() ──► Effects ──► spawned request / timer
//!                                      ▲                             │
//!                                      └──── poll_responses ◄────────┘
//!                                             (completion channel)
//! ```
//!
//! Request tasks and the dismiss timer never touch the state directly; they
//! post an [`Action`] back on an internal channel, and the owner of the
//! controller drains it with [`Lookup::poll_responses`] or
//! [`Lookup::next_response`]. Only one request task runs at a time: a new
//! search or drill-down aborts the previous one.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backend::RegistryBackend;
use crate::error::LookupError;
use crate::events::SurfaceEvent;
use crate::messages::LookupMessage;
use crate::notification::DismissTimer;
use crate::query::SearchQuery;
use crate::state::{update, Action, Effect, LookupState, ReducerConfig};

/// The lookup controller
pub struct Lookup<B: RegistryBackend> {
    /// Reducer settings
    config: ReducerConfig,
    /// Registry backend
    backend: Arc<B>,
    /// Presentation state
    state: LookupState,
    /// Channel to the UI surface
    tx: mpsc::Sender<LookupMessage>,
    /// Completions posted by request tasks and timers
    completions_tx: mpsc::UnboundedSender<Action>,
    completions_rx: mpsc::UnboundedReceiver<Action>,
    /// Current search or drill-down task
    in_flight: Option<JoinHandle<()>>,
    /// Auto-dismiss for the visible notice
    dismiss_timer: DismissTimer,
    /// Set once shutdown has run
    shut_down: bool,
}

impl<B: RegistryBackend + 'static> Lookup<B> {
    /// Create a controller around `backend`
    pub fn new(backend: B, config: ReducerConfig, tx: mpsc::Sender<LookupMessage>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let state = LookupState::new(config.page_size);
        Self {
            config,
            backend: Arc::new(backend),
            state,
            tx,
            completions_tx,
            completions_rx,
            in_flight: None,
            dismiss_timer: DismissTimer::new(),
            shut_down: false,
        }
    }

    /// Current presentation state
    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// Whether a search or drill-down task is still running
    pub fn has_in_flight(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Probe the backend in the background and log the result
    ///
    /// Returns immediately. The probe never touches the presentation state,
    /// so an unreachable registry cannot hold up the first frame.
    pub fn start(&self) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if backend.health_check().await {
                tracing::info!(backend = backend.name(), "Registry reachable");
            } else {
                tracing::warn!(
                    backend = backend.name(),
                    "Registry not reachable - searches will fail until it is"
                );
            }
        });
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        let action = match event {
            SurfaceEvent::Connected => {
                self.send(LookupMessage::state(&self.state)).await;
                return Ok(());
            }
            SurfaceEvent::QuitRequested => return self.shutdown().await,
            SurfaceEvent::ModeSelected { mode } => Action::SelectMode(mode),
            SurfaceEvent::ModeCycled { forward } => Action::CycleMode { forward },
            SurfaceEvent::InputChanged { text } => Action::SetInput(text),
            SurfaceEvent::Submit => Action::Submit,
            SurfaceEvent::RowSelected { index } => Action::SelectRow(index),
            SurfaceEvent::CloseDetail => Action::CloseDetail,
            SurfaceEvent::NextPage => Action::NextPage,
            SurfaceEvent::PrevPage => Action::PrevPage,
            SurfaceEvent::GoToPage { page } => Action::GoToPage(page),
            SurfaceEvent::DismissNotification => Action::DismissNotification,
            SurfaceEvent::NotificationLinkOpened => Action::FollowNotificationLink,
        };
        self.dispatch(action).await;
        Ok(())
    }

    /// Apply every completion that has arrived, without waiting
    ///
    /// Call this regularly. Returns true if anything was applied.
    pub async fn poll_responses(&mut self) -> bool {
        let mut pending = Vec::new();
        while let Ok(action) = self.completions_rx.try_recv() {
            pending.push(action);
        }
        let activity = !pending.is_empty();
        for action in pending {
            self.dispatch(action).await;
        }
        activity
    }

    /// Wait for the next completion and apply it
    pub async fn next_response(&mut self) {
        if let Some(action) = self.completions_rx.recv().await {
            self.dispatch(action).await;
        }
    }

    /// Cancel outstanding work and tell the surface to quit
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;
        self.cancel_in_flight();
        self.dismiss_timer.cancel();

        self.send(LookupMessage::Quit {
            message: Some("Goodbye!".to_string()),
        })
        .await;
        Ok(())
    }

    /// Run one action through the reducer and publish what changed
    async fn dispatch(&mut self, action: Action) {
        if self.shut_down {
            tracing::debug!(?action, "Ignoring action after shutdown");
            return;
        }

        let before = self.state.clone();
        let effects = update(&mut self.state, action, &self.config);

        for effect in effects {
            self.execute(effect);
        }

        if before.notification != self.state.notification {
            if let Some(old) = &before.notification {
                self.send(LookupMessage::NotifyDismissed { id: old.id }).await;
            }
            if let Some(new) = &self.state.notification {
                self.send(LookupMessage::notify(new)).await;
            }
        }

        if before != self.state {
            self.send(LookupMessage::state(&self.state)).await;
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::CancelInFlight => self.cancel_in_flight(),
            Effect::Search { generation, query } => {
                tracing::info!(%query, generation = generation.0, "Dispatching search");
                self.spawn_request(query, move |outcome| Action::SearchCompleted {
                    generation,
                    outcome,
                });
            }
            Effect::FetchDetail { generation, query } => {
                tracing::info!(%query, generation = generation.0, "Fetching detail");
                self.spawn_request(query, move |outcome| Action::DetailCompleted {
                    generation,
                    outcome,
                });
            }
            Effect::ScheduleDismiss { id, after } => {
                let tx = self.completions_tx.clone();
                self.dismiss_timer.schedule(id, after, move |id| {
                    let _ = tx.send(Action::NotificationExpired(id));
                });
            }
            Effect::CancelDismiss => self.dismiss_timer.cancel(),
            Effect::OpenLink(link) => {
                tracing::info!(%link, "Notice link followed");
            }
        }
    }

    fn spawn_request<F>(&mut self, query: SearchQuery, complete: F)
    where
        F: FnOnce(Result<serde_json::Value, LookupError>) -> Action + Send + 'static,
    {
        self.cancel_in_flight();
        let backend = Arc::clone(&self.backend);
        let tx = self.completions_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = backend.search(&query).await;
            if tx.send(complete(outcome)).is_err() {
                tracing::debug!("Controller dropped before request completed");
            }
        }));
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                tracing::debug!("Aborting in-flight request");
            }
            handle.abort();
        }
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: LookupMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

impl<B: RegistryBackend> Drop for Lookup<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
