//! Registry Backend Integration
//!
//! Access to the business registry through a common trait, so the controller
//! never depends on a concrete transport.
//!
//! # Usage
//!
//! ```ignore
//! use bizlookup_core::backend::{BackendConfig, HttpRegistry, RegistryBackend};
//! use bizlookup_core::{SearchMode, SearchQuery};
//!
//! let registry = HttpRegistry::new(&BackendConfig::new("https://registry.example"))?;
//! let query = SearchQuery::compose(SearchMode::Name, "Acme")?;
//! let payload = registry.search(&query).await?;
//! ```

mod http;
mod traits;

pub use http::HttpRegistry;
pub use traits::{BackendConfig, RegistryBackend, DEFAULT_BASE_URL};
