//! Lookup Core - Headless Business Registry Search
//!
//! This crate holds everything about a registry lookup that is not drawing:
//! composing a query, sending it, classifying whatever comes back, and the
//! state machine that decides what the screen should show. It can drive the
//! terminal surface or run headless under test.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI Surface (tui)                      │
//! └───────────────┬──────────────────────────────▲───────────────┘
//!                 │ SurfaceEvent (up)            │ LookupMessage (down)
//! ┌───────────────▼──────────────────────────────┴───────────────┐
//! │                          LOOKUP CORE                         │
//! │  ┌─────────┐   ┌──────────────┐   ┌──────────┐  ┌──────────┐ │
//! │  │  Query  │──►│   Reducer    │──►│ Effects  │─►│ Registry │ │
//! │  │Composer │   │ (state.rs)   │◄──│ (Lookup) │◄─│ Backend  │ │
//! │  └─────────┘   └──────┬───────┘   └──────────┘  └──────────┘ │
//! │                       │ classify()                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Lookup`]: Controller that owns the state and runs effects
//! - [`LookupState`]: Everything the surface renders
//! - [`SearchQuery`]: A validated, trimmed search
//! - [`SearchResult`]: A classified registry payload
//! - [`RegistryBackend`]: Transport abstraction; [`HttpRegistry`] is the real one
//!
//! # Quick Start
//!
//! ```ignore
//! use bizlookup_core::{HttpRegistry, Lookup, LookupConfig, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! let config = bizlookup_core::load_config()?;
//! let backend = HttpRegistry::new(&config.backend_config())?;
//! let (tx, mut rx) = mpsc::channel(100);
//! let mut lookup = Lookup::new(backend, config.reducer_config(), tx);
//!
//! lookup.handle_event(SurfaceEvent::Connected).await?;
//! lookup.handle_event(SurfaceEvent::InputChanged { text: "201912345A".into() }).await?;
//! lookup.handle_event(SurfaceEvent::Submit).await?;
//!
//! loop {
//!     lookup.poll_responses().await;
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message
//!     }
//! }
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod classify;
pub mod config;
pub mod error;
pub mod events;
pub mod lookup;
pub mod messages;
pub mod notification;
pub mod pagination;
pub mod query;
pub mod record;
pub mod state;

// Re-exports for convenience
pub use backend::{BackendConfig, HttpRegistry, RegistryBackend};
pub use classify::classify;
pub use error::LookupError;
pub use events::SurfaceEvent;
pub use lookup::Lookup;
pub use messages::LookupMessage;
pub use notification::{Notification, NotificationId, NotificationPolicy, NotifyLevel};
pub use pagination::Pagination;
pub use query::{SearchMode, SearchQuery};
pub use record::{AggregateResult, BusinessRecord, ResultTag, SearchResult};
pub use state::{update, Action, DetailState, Effect, Generation, LookupState, ReducerConfig, View};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, LookupConfig, LookupToml, NotificationMode,
};
