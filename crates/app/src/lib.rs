//! # cardflow-app
//!
//! Application layer: use-cases, the automation engine and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RuleRepository`: rule store, including the active-rule query
//!   - `BoardMutationStore`: card field updates and label/member associations
//!   - `CardRepository`: card persistence for the card use-cases
//!   - `AuditLogSink`: append-only automation log
//! - Provide the **automation engine**: `AutomationEngine` (trigger dispatch)
//!   and `ActionExecutor` (one action, one mutation)
//! - Define **driving/inbound ports** as use-case structs:
//!   - `CardService`: create and move cards, firing automation triggers
//!   - `RuleService`: manage rules and read their audit trail
//!
//! ## Dependency rule
//! Depends on `cardflow-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod action_executor;
pub mod automation_engine;
pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;
