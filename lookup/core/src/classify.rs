//! Result Classifier
//!
//! Decodes an untyped registry payload into a [`SearchResult`]. The registry
//! does not put a discriminant on every shape, so classification runs an
//! ordered set of structural predicates:
//!
//! 1. **List**: `DATA_TYPE == "MULTIPLE_COM"` and a `COMPANY_LIST` array
//! 2. **Aggregate**: an `SSIC` field and a numeric `TOTAL_COUNT`
//! 3. **Single**: `UEN`, `ENTITY_NAME` and `DATA_TYPE` all present
//! 4. Anything else is an error, carrying the payload's `message` if any
//!
//! The order is part of the contract: a list payload that also happens to
//! carry `SSIC`/`TOTAL_COUNT` is still a list.

use serde_json::Value;

use crate::error::LookupError;
use crate::query::SearchMode;
use crate::record::{AggregateResult, BusinessRecord, SearchResult, MULTIPLE_RECORDS_MARKER};

/// Payload fields the predicates inspect
mod field {
    pub const DATA_TYPE: &str = "DATA_TYPE";
    pub const COMPANY_LIST: &str = "COMPANY_LIST";
    pub const SSIC: &str = "SSIC";
    pub const TOTAL_COUNT: &str = "TOTAL_COUNT";
    pub const UEN: &str = "UEN";
    pub const ENTITY_NAME: &str = "ENTITY_NAME";
    pub const MESSAGE: &str = "message";
}

/// Classify a payload returned for a search in `mode`
///
/// # Errors
///
/// Returns [`LookupError::Classification`] when no shape matches, or when a
/// single-record payload matches structurally but cannot be decoded.
pub fn classify(payload: &Value, mode: SearchMode) -> Result<SearchResult, LookupError> {
    if let Some(rows) = list_rows(payload) {
        return Ok(SearchResult::List(decode_rows(rows)));
    }

    if let Some(aggregate) = aggregate(payload) {
        return Ok(SearchResult::Aggregate(aggregate));
    }

    if is_single_record(payload) {
        let record: BusinessRecord = serde_json::from_value(payload.clone()).map_err(|e| {
            tracing::warn!(error = %e, "Single-record payload failed to decode");
            LookupError::Classification(None)
        })?;
        return Ok(match mode {
            SearchMode::Uen => SearchResult::Single(record),
            SearchMode::Name | SearchMode::Ssic => SearchResult::SingleFromList(record),
        });
    }

    let message = payload
        .get(field::MESSAGE)
        .and_then(Value::as_str)
        .map(String::from);
    Err(LookupError::Classification(message))
}

fn list_rows(payload: &Value) -> Option<&Vec<Value>> {
    let marker = payload.get(field::DATA_TYPE).and_then(Value::as_str)?;
    if marker != MULTIPLE_RECORDS_MARKER {
        return None;
    }
    payload.get(field::COMPANY_LIST).and_then(Value::as_array)
}

fn decode_rows(rows: &[Value]) -> Vec<BusinessRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value(row.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(row = idx, error = %e, "Skipping undecodable list row");
                None
            }
        })
        .collect()
}

fn aggregate(payload: &Value) -> Option<AggregateResult> {
    let code = match payload.get(field::SSIC)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let count = match payload.get(field::TOTAL_COUNT)? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    Some(AggregateResult { code, count })
}

fn is_single_record(payload: &Value) -> bool {
    [field::UEN, field::ENTITY_NAME, field::DATA_TYPE]
        .iter()
        .all(|key| payload.get(key).is_some_and(|v| !v.is_null()))
}
