//! # cardflow-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a JSON API for creating and moving cards, which fires
//!   automation triggers
//! - Serve rule management endpoints and the per-rule audit trail
//! - Map application results and [`BoardError`](cardflow_domain::error::BoardError)s
//!   into HTTP responses
//!
//! ## Dependency rule
//! Depends on `cardflow-app` (for port traits and services) and
//! `cardflow-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
