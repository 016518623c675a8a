//! Error types for backends and stores

use store_dispatch::RuntimeError;
use thiserror::Error;

/// Failure reported by a data backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Login was attempted with an empty email or password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The operation itself failed. The message may be empty.
    #[error("{0}")]
    Operation(String),

    /// A news payload broke a catalog invariant.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl BackendError {
    /// The message a store records, `fallback` when there is none.
    pub fn message_or(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }

    /// Whether the input was rejected before any work was done.
    pub fn is_validation(&self) -> bool {
        matches!(self, BackendError::InvalidCredentials)
    }
}

/// A news payload that cannot be shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("article {article}: {verified} verified claims exceed {total} total claims")]
    FactCheckClaims {
        article: String,
        verified: u32,
        total: u32,
    },

    #[error("article {article}: fact-check score {score} is out of range 0-100")]
    ScoreOutOfRange { article: String, score: u8 },

    #[error("source {source_id}: credibility score {score} is out of range 0-100")]
    CredibilityOutOfRange { source_id: String, score: u8 },

    #[error("duplicate article id {0}")]
    DuplicateArticle(String),

    #[error("duplicate topic id {0}")]
    DuplicateTopic(String),
}

/// Why a store command did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The operation failed. Carries the message now held in the store's `error`.
    #[error("{0}")]
    Rejected(String),

    /// The store was shut down.
    #[error("store is shut down")]
    Closed,
}

impl From<RuntimeError> for StoreError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Closed => StoreError::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_fallback() {
        assert_eq!(
            BackendError::Operation(String::new()).message_or("Failed to fetch news"),
            "Failed to fetch news"
        );
        assert_eq!(
            BackendError::Operation("timeout".into()).message_or("Failed to fetch news"),
            "timeout"
        );
        assert_eq!(
            BackendError::InvalidCredentials.message_or("Login failed"),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_validation_kind() {
        assert!(BackendError::InvalidCredentials.is_validation());
        assert!(!BackendError::Operation("x".into()).is_validation());
    }

    #[test]
    fn test_catalog_error_is_transparent() {
        let err: BackendError = CatalogError::DuplicateTopic("3".into()).into();
        assert_eq!(err.to_string(), "duplicate topic id 3");
    }
}
