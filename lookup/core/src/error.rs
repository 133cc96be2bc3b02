//! Lookup Errors
//!
//! Every failure that can end a search. The surface never sees these as
//! structured values; it renders [`LookupError::user_message`] verbatim.

use thiserror::Error;

/// Shown when the search box is blank on submit
pub const VALIDATION_MESSAGE: &str = "Please enter a search term.";

/// Shown for a 404 from the registry, regardless of body
pub const NOT_FOUND_MESSAGE: &str = "No Live Company Found";

/// Shown when a failure carries no message of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while fetching company data.";

/// Shown when a payload matches none of the known shapes
pub const UNRECOGNIZED_MESSAGE: &str = "No results found or invalid response format.";

/// Errors produced while composing, sending, or classifying a search
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// Blank or whitespace-only search text
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,

    /// Registry answered with a 404-equivalent status
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// Transport failure or any other non-success status
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Network {
        /// Message reported by the server or transport, if any
        message: Option<String>,
    },

    /// Payload did not match any known response shape
    #[error("{}", .0.as_deref().unwrap_or(UNRECOGNIZED_MESSAGE))]
    Classification(Option<String>),
}

impl LookupError {
    /// Network error with a message
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: Some(message.into()),
        }
    }

    /// The single string the surface displays for this error
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Short machine-friendly kind, used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Network { .. } => "network",
            Self::Classification(_) => "classification",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(LookupError::Validation.user_message(), "Please enter a search term.");
        assert_eq!(LookupError::NotFound.user_message(), "No Live Company Found");
    }

    #[test]
    fn test_network_message_propagates() {
        assert_eq!(LookupError::network("rate limited").user_message(), "rate limited");
        assert_eq!(
            LookupError::Network { message: None }.user_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_classification_message() {
        assert_eq!(
            LookupError::Classification(Some("Invalid SSIC".to_string())).user_message(),
            "Invalid SSIC"
        );
        assert_eq!(
            LookupError::Classification(None).user_message(),
            UNRECOGNIZED_MESSAGE
        );
    }
}
