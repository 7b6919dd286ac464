//! Service-level error type.

use thiserror::Error;

use crate::db::StoreError;

/// Errors produced by mutation services.
///
/// The first three variants are domain failures whose messages are written
/// for API clients. [`ServiceError::Store`] wraps store-level failures and
/// is never shown verbatim; see [`ServiceError::client_message`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input field.
    #[error("{0}")]
    InvalidInput(String),

    /// A referenced id does not resolve in the store.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique key (e.g., email already registered).
    #[error("{0}")]
    Conflict(String),

    /// The store itself failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// The message to return to API clients.
    ///
    /// Domain failures pass through; store failures collapse to a generic
    /// message so connection strings and constraint names stay internal.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg.clone(),
            Self::Store(_) => "Internal server error.".to_owned(),
        }
    }

    /// Whether this error should be reported to error tracking.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_messages_pass_through() {
        let err = ServiceError::InvalidInput("Price must be positive.".to_owned());
        assert_eq!(err.client_message(), "Price must be positive.");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_store_errors_are_masked() {
        let err = ServiceError::Store(StoreError::DataCorruption(
            "invalid email in database".to_owned(),
        ));
        assert_eq!(err.client_message(), "Internal server error.");
        assert!(err.is_internal());
    }
}
