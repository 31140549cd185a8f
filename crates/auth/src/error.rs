use thiserror::Error;

use fellowship_core::DomainError;

/// Infrastructure failure while reading session or group state.
///
/// Never a denial: denials are [`crate::PermissionCheck`] values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("session lookup failed: {0}")]
    Session(String),

    #[error("group membership lookup failed: {0}")]
    Membership(String),

    #[error("group lookup failed: {0}")]
    Directory(String),

    #[error("permission backend unavailable")]
    Unavailable,
}

/// Failure of a privileged action run through [`crate::guard`].
#[derive(Debug, Error)]
pub enum ActionError {
    /// The re-check right before the mutation denied it.
    #[error("{reason}")]
    Denied { reason: String },

    /// A business precondition independent of authorization failed.
    #[error(transparent)]
    Precondition(#[from] DomainError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The downstream mutating service failed.
    #[error("action failed: {0}")]
    Mutation(anyhow::Error),
}

impl ActionError {
    /// Message to show the user in place of the action's result.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Precondition(err) => err.detail().to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, ActionError::Denied { .. })
    }
}
