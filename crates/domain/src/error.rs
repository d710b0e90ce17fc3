//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BoardError`]
//! via `#[from]`.

/// Top-level error returned by ports and services.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A uniqueness constraint rejected a write because the record already exists.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BoardError {
    /// Whether this error means the written record already exists.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("list id must not be empty")]
    EmptyListId,

    #[error("trigger value must not be empty")]
    EmptyTriggerValue,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("unknown trigger type: {0}")]
    UnknownTriggerType(String),

    #[error("unknown log status: {0}")]
    UnknownLogStatus(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A uniqueness constraint violation on `entity`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {key} already exists")]
pub struct ConflictError {
    pub entity: &'static str,
    pub key: String,
}
