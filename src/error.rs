//! Analytics error types

use thiserror::Error;

/// Errors surfaced by the analytics engines.
#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    /// No user with the requested id exists in the store
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// A dataset row violates an entity invariant
    #[error("invalid dataset: {0}")]
    Dataset(String),
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
