//! Query Composer
//!
//! Search mode selection and normalization of the free-text input. A
//! [`SearchQuery`] can only be built through [`SearchQuery::compose`], so any
//! query that reaches the backend is known to carry non-blank, trimmed text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Which registry index a search runs against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMode {
    /// Unique entity number (exact identifier lookup)
    #[default]
    Uen,
    /// Company name (may return many records)
    Name,
    /// Industry classification code (returns an aggregate count)
    Ssic,
}

impl SearchMode {
    /// All modes in selector order
    pub const ALL: [SearchMode; 3] = [SearchMode::Uen, SearchMode::Name, SearchMode::Ssic];

    /// Value sent as the `type` query parameter
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Uen => "UEN",
            Self::Name => "NAME",
            Self::Ssic => "SSIC",
        }
    }

    /// Human-readable label for the selector
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Uen => "UEN",
            Self::Name => "Company Name",
            Self::Ssic => "SSIC Code",
        }
    }

    /// Placeholder hint for the input box
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Uen => "e.g. 201912345A",
            Self::Name => "e.g. Acme",
            Self::Ssic => "e.g. 62010",
        }
    }

    /// Next mode in selector order (wraps)
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Uen => Self::Name,
            Self::Name => Self::Ssic,
            Self::Ssic => Self::Uen,
        }
    }

    /// Previous mode in selector order (wraps)
    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            Self::Uen => Self::Ssic,
            Self::Name => Self::Uen,
            Self::Ssic => Self::Name,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UEN" => Ok(Self::Uen),
            "NAME" => Ok(Self::Name),
            "SSIC" => Ok(Self::Ssic),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

/// A validated search ready for dispatch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    mode: SearchMode,
    text: String,
}

impl SearchQuery {
    /// Validate and normalize raw input
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Validation`] when `raw` is empty or whitespace.
    pub fn compose(mode: SearchMode, raw: &str) -> Result<Self, LookupError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(LookupError::Validation);
        }
        Ok(Self {
            mode,
            text: text.to_string(),
        })
    }

    /// Drill-down lookup of a single record by identifier
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Validation`] for a blank identifier.
    pub fn detail(uen: &str) -> Result<Self, LookupError> {
        Self::compose(SearchMode::Uen, uen)
    }

    /// The search mode
    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// The trimmed search text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Query pairs for the registry endpoint (`type`, `data`)
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [("type", self.mode.wire_name()), ("data", self.text.as_str())]
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.mode, self.text)
    }
}
