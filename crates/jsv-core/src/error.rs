//! # Error Types: Structured Error Hierarchy
//!
//! Defines the infrastructure errors shared across jsv. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! These are *fatal* failures: they mean the schema or the environment is
//! broken. Ordinary non-conformance of an instance is never an error value;
//! it is recorded as a violation by the engine.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JCS serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A schema document could not be produced for a locator.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// No document exists for the locator.
    #[error("schema '{locator}' not found")]
    NotFound {
        /// The locator that was requested.
        locator: String,
    },

    /// The document exists but could not be read.
    #[error("schema '{locator}' could not be read: {source}")]
    Io {
        /// The locator that was requested.
        locator: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The document was read but is not valid JSON/YAML.
    #[error("schema '{locator}' could not be decoded: {reason}")]
    Decode {
        /// The locator that was requested.
        locator: String,
        /// Decoder message.
        reason: String,
    },

    /// The locator escapes the store root (e.g. `../secret.json`).
    #[error("schema '{locator}' resolves outside the store root")]
    OutsideRoot {
        /// The locator that was requested.
        locator: String,
    },
}

impl ResolutionError {
    /// The locator this error refers to.
    pub fn locator(&self) -> &str {
        match self {
            Self::NotFound { locator }
            | Self::Io { locator, .. }
            | Self::Decode { locator, .. }
            | Self::OutsideRoot { locator } => locator,
        }
    }
}

/// A caller-supplied type predicate failed to produce an answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PredicateError(String);

impl PredicateError {
    /// Create a predicate error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_locator() {
        let err = ResolutionError::NotFound {
            locator: "person.json".to_string(),
        };
        assert_eq!(err.locator(), "person.json");
        assert_eq!(err.to_string(), "schema 'person.json' not found");

        let err = ResolutionError::Io {
            locator: "a.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.locator(), "a.json");
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_predicate_error_display() {
        let err = PredicateError::new("lookup table unavailable");
        assert_eq!(err.message(), "lookup table unavailable");
        assert_eq!(err.to_string(), "lookup table unavailable");
    }
}
