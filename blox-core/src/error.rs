//! Error types for the object graph.

use crate::id::{GroupId, RoleId};

/// Main error type for client operations.
///
/// Every variant owns plain data so one fetch outcome can be handed to all
/// callers waiting on the same in-flight request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] roblox_http::Error),

    /// A lookup the caller cannot proceed without found nothing
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The API answered with a non-success status
    #[error("Upstream error (status {status}): {context}")]
    Upstream { status: u16, context: String },

    /// A payload did not match its expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The operation needs an authenticated user
    #[error("Not logged in")]
    NotLoggedIn,

    /// A role was offered to a group that does not own it
    #[error("Role {role} is not registered in group {group}")]
    ForeignRole { role: RoleId, group: GroupId },

    /// The Guest role cannot be removed
    #[error("The Guest role of group {group} cannot be removed")]
    GuestRoleRemoval { group: GroupId },

    /// The request this caller was waiting on was dropped before finishing
    #[error("In-flight request abandoned: {0}")]
    Abandoned(String),
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn upstream(status: u16, context: impl Into<String>) -> Self {
        Error::Upstream {
            status,
            context: context.into(),
        }
    }

    /// Whether this is an explicit absence rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
