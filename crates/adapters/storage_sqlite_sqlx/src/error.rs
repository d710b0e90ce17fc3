//! Storage-specific error type wrapping sqlx errors.

use cardflow_domain::error::{BoardError, ConflictError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for BoardError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Map an insert error, turning a uniqueness violation into a conflict.
pub(crate) fn conflict_or_storage(err: sqlx::Error, entity: &'static str, key: String) -> BoardError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ConflictError { entity, key }.into()
        }
        _ => StorageError::from(err).into(),
    }
}
