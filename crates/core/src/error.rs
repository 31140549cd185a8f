//! Domain error model.

use thiserror::Error;

/// Deterministic business failure, independent of who is asking.
///
/// Authorization denials are not domain errors; they are check results in
/// the auth layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A business rule would be broken (e.g. a group left without a leader).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// The message without the category prefix, for showing to users.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg)
            | DomainError::NotFound(msg) => msg,
        }
    }
}
