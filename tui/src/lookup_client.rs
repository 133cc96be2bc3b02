//! Lookup Client
//!
//! Thin wrapper around the embedded [`Lookup`] controller. The TUI holds no
//! search logic of its own; it turns key presses into [`SurfaceEvent`]s
//! through this client and renders the [`LookupMessage`]s that come back.

use tokio::sync::mpsc;

use bizlookup_core::{
    HttpRegistry, Lookup, LookupConfig, LookupMessage, LookupState, ReducerConfig,
    RegistryBackend, SearchMode, SurfaceEvent,
};

/// Capacity of the controller -> surface channel
const MESSAGE_BUFFER: usize = 100;

/// Client for the embedded lookup controller
pub struct LookupClient<B: RegistryBackend + 'static = HttpRegistry> {
    lookup: Lookup<B>,
    rx: mpsc::Receiver<LookupMessage>,
}

impl LookupClient<HttpRegistry> {
    /// Build a client talking to the registry named in `config`
    pub fn from_config(config: &LookupConfig) -> anyhow::Result<Self> {
        let backend = HttpRegistry::new(&config.backend_config())?;
        Ok(Self::new(backend, config.reducer_config()))
    }
}

impl<B: RegistryBackend + 'static> LookupClient<B> {
    /// Wrap `backend` in a fresh controller
    pub fn new(backend: B, config: ReducerConfig) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_BUFFER);
        Self {
            lookup: Lookup::new(backend, config, tx),
            rx,
        }
    }

    /// Probe the registry in the background
    pub fn start(&self) {
        self.lookup.start();
    }

    /// Attach this surface; the controller answers with a snapshot
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.lookup.handle_event(SurfaceEvent::Connected).await
    }

    /// Pick a search mode
    pub async fn select_mode(&mut self, mode: SearchMode) -> anyhow::Result<()> {
        self.lookup
            .handle_event(SurfaceEvent::ModeSelected { mode })
            .await
    }

    /// Step the mode selector
    pub async fn cycle_mode(&mut self, forward: bool) -> anyhow::Result<()> {
        self.lookup
            .handle_event(SurfaceEvent::ModeCycled { forward })
            .await
    }

    /// Replace the input text
    pub async fn set_input(&mut self, text: String) -> anyhow::Result<()> {
        self.lookup
            .handle_event(SurfaceEvent::InputChanged { text })
            .await
    }

    /// Run the search
    pub async fn submit(&mut self) -> anyhow::Result<()> {
        self.lookup.handle_event(SurfaceEvent::Submit).await
    }

    /// Open a list row (absolute index)
    pub async fn select_row(&mut self, index: usize) -> anyhow::Result<()> {
        self.lookup
            .handle_event(SurfaceEvent::RowSelected { index })
            .await
    }

    /// Leave the detail pane
    pub async fn close_detail(&mut self) -> anyhow::Result<()> {
        self.lookup.handle_event(SurfaceEvent::CloseDetail).await
    }

    /// Next list page
    pub async fn next_page(&mut self) -> anyhow::Result<()> {
        self.lookup.handle_event(SurfaceEvent::NextPage).await
    }

    /// Previous list page
    pub async fn prev_page(&mut self) -> anyhow::Result<()> {
        self.lookup.handle_event(SurfaceEvent::PrevPage).await
    }

    /// Jump to a 1-based list page
    pub async fn go_to_page(&mut self, page: usize) -> anyhow::Result<()> {
        self.lookup
            .handle_event(SurfaceEvent::GoToPage { page })
            .await
    }

    /// Close the notice
    pub async fn dismiss_notification(&mut self) -> anyhow::Result<()> {
        self.lookup
            .handle_event(SurfaceEvent::DismissNotification)
            .await
    }

    /// Follow the link in the notice
    pub async fn open_notification_link(&mut self) -> anyhow::Result<()> {
        self.lookup
            .handle_event(SurfaceEvent::NotificationLinkOpened)
            .await
    }

    /// Ask the controller to shut down
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.lookup.handle_event(SurfaceEvent::QuitRequested).await
    }

    /// Apply finished requests and timers (call every tick)
    pub async fn poll_responses(&mut self) -> bool {
        self.lookup.poll_responses().await
    }

    /// Wait for the next finished request or timer
    pub async fn next_response(&mut self) {
        self.lookup.next_response().await;
    }

    /// Receive all pending messages (non-blocking)
    pub fn recv_all(&mut self) -> Vec<LookupMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Controller-side state
    pub fn state(&self) -> &LookupState {
        self.lookup.state()
    }
}
