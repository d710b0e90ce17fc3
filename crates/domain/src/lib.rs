//! # cardflow-domain
//!
//! Pure domain model for the cardflow board automation system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Cards** and the partial updates automation may apply to them
//! - Define **Automation rules** (trigger → ordered actions) and the
//!   **Trigger events** that fire them
//! - Define **Audit log entries** recording each rule execution
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod card;
