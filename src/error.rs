//! Error types for the addon provider
//!
//! The taxonomy is deliberately pass-through: network, validation and
//! not-found errors from the platform API are surfaced to the host framework
//! unmodified. The only local policy lives in the CRUD handlers (idempotent
//! delete, absent-on-read) and is driven by [`Error::is_not_found`].

use thiserror::Error;

/// Unified error type for the provider
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Local Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // =========================================================================
    // Platform API Errors
    // =========================================================================
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

    #[error("Platform API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Error {
    /// Build a structured not-found error
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Check whether the remote system reported the entity as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this error is transient (the host may retry the operation)
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}

/// Result type alias for the provider
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = Error::not_found("Addon", "deployhooks-12345");
        assert!(err.is_not_found());
        assert!(!err.is_transient());
        assert_eq!(format!("{}", err), "Addon not found: deployhooks-12345");
    }

    #[test]
    fn test_validation_is_permanent() {
        let err = Error::Validation("plan must not be empty".into());
        assert!(!err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 422,
            code: "invalid_params".into(),
            message: "Couldn't find that plan".into(),
        };
        assert_eq!(
            format!("{}", err),
            "Platform API error (422) invalid_params: Couldn't find that plan"
        );
    }
}
