//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod audit_log;
pub mod board_store;
pub mod dispatcher;
pub mod rule_repo;

pub use audit_log::AuditLogSink;
pub use board_store::{BoardMutationStore, CardRepository};
pub use dispatcher::TriggerDispatcher;
pub use rule_repo::RuleRepository;
