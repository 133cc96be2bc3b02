//! Business Lookup TUI - terminal surface for the registry lookup
//!
//! A full-screen interface over [`bizlookup_core`]. All search logic lives
//! in the core; this crate turns key presses into surface events and draws
//! what the controller reports.
//!
//! # Architecture
//!
//! - **App**: event loop, key bindings, region renderers
//! - **LookupClient**: embeds the controller and collects its messages
//! - **Display**: render-side state built from controller messages
//! - **Compositor**: z-ordered layers so the toast can float over results

pub mod app;
pub mod compositor;
pub mod display;
pub mod lookup_client;
pub mod theme;

pub use app::{App, Focus};
pub use display::{DisplayState, DisplayToast};
pub use lookup_client::LookupClient;
