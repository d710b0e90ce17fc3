//! # cardflow-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the port traits defined in `cardflow-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Surface uniqueness violations as `BoardError::Conflict`
//!
//! ## Dependency rule
//! Depends on `cardflow-app` (for port traits) and `cardflow-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod audit_log;
mod board_store;
mod error;
mod pool;
mod rule_repo;
mod time;

pub use audit_log::SqliteAuditLog;
pub use board_store::SqliteBoardStore;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use rule_repo::SqliteRuleRepository;
