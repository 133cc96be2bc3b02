//! Registry Records
//!
//! Shapes returned by the registry search API, plus the tagged union the
//! classifier produces from them. Field names follow the registry payload.

use serde::{Deserialize, Serialize};

/// Discriminant value the registry uses for a multi-record payload
pub const MULTIPLE_RECORDS_MARKER: &str = "MULTIPLE_COM";

/// One registered business
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Unique entity number
    #[serde(rename = "UEN")]
    pub uen: String,
    /// Registered display name
    #[serde(rename = "ENTITY_NAME")]
    pub entity_name: String,
    /// Entity type description (e.g. "Local Company")
    #[serde(rename = "ENTITY_TYPE_DESC", default)]
    pub entity_type: String,
    /// Constitution description, absent for many entity types
    #[serde(rename = "CONSTITUTION_DESC", default)]
    pub constitution: Option<String>,
    /// Primary industry classification code
    #[serde(rename = "PRIMARY_SSIC_CODE", default)]
    pub primary_ssic: String,
    /// Status description (e.g. "Live Company")
    #[serde(rename = "ENTITY_STATUS_DESC", default)]
    pub status: String,
    /// Registration or incorporation date as sent by the registry
    #[serde(rename = "REGISTRATION_INCORPORATION_DATE", default)]
    pub registration_date: String,
    /// Shape marker, present on single-record payloads
    #[serde(rename = "DATA_TYPE", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl BusinessRecord {
    /// Labelled fields in display order
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("UEN", self.uen.as_str()),
            ("Entity Name", self.entity_name.as_str()),
            ("Entity Type", self.entity_type.as_str()),
            ("Constitution", self.constitution.as_deref().unwrap_or("-")),
            ("Primary SSIC", self.primary_ssic.as_str()),
            ("Status", self.status.as_str()),
            ("Registration Date", self.registration_date.as_str()),
        ]
    }
}

/// Count of businesses sharing one classification code
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Classification code searched
    #[serde(rename = "SSIC")]
    pub code: String,
    /// Number of live businesses with that code
    #[serde(rename = "TOTAL_COUNT")]
    pub count: u64,
}

/// Which presentation a classified result maps to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultTag {
    /// Direct identifier lookup
    Single,
    /// Non-identifier search that collapsed to one record
    SingleFromList,
    /// Aggregate count
    Aggregate,
    /// Multi-record list
    List,
}

impl ResultTag {
    /// Heading shown above the result
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Single => "Company Details",
            Self::SingleFromList => "Matching Company",
            Self::Aggregate => "Industry Summary",
            Self::List => "Matching Companies",
        }
    }
}

/// A classified search response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchResult {
    /// Single record from an identifier search
    Single(BusinessRecord),
    /// Single record from a name or code search
    SingleFromList(BusinessRecord),
    /// Aggregate count for a classification code
    Aggregate(AggregateResult),
    /// Ordered list of records, possibly empty
    List(Vec<BusinessRecord>),
}

impl SearchResult {
    /// Presentation tag for this result
    #[must_use]
    pub fn tag(&self) -> ResultTag {
        match self {
            Self::Single(_) => ResultTag::Single,
            Self::SingleFromList(_) => ResultTag::SingleFromList,
            Self::Aggregate(_) => ResultTag::Aggregate,
            Self::List(_) => ResultTag::List,
        }
    }

    /// The record, for either single-record variant
    #[must_use]
    pub fn record(&self) -> Option<&BusinessRecord> {
        match self {
            Self::Single(record) | Self::SingleFromList(record) => Some(record),
            Self::Aggregate(_) | Self::List(_) => None,
        }
    }
}
