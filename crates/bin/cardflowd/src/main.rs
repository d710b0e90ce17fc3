//! # cardflowd: cardflow daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the automation engine and application services
//! - Build the axum router and serve until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cardflow_adapter_http_axum::router;
use cardflow_adapter_http_axum::state::AppState;
use cardflow_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteAuditLog, SqliteBoardStore, SqliteRuleRepository,
};
use cardflow_app::automation_engine::AutomationEngine;
use cardflow_app::services::card_service::CardService;
use cardflow_app::services::rule_service::RuleService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to initialise database")?;
    let pool = db.pool().clone();

    // Stores
    let board_store = SqliteBoardStore::new(pool.clone());
    let rule_repo = SqliteRuleRepository::new(pool.clone());
    let audit_log = SqliteAuditLog::new(pool);

    // Automation
    let policy = config.action_failure_policy();
    let engine = Arc::new(
        AutomationEngine::new(rule_repo.clone(), board_store.clone(), audit_log.clone())
            .with_policy(policy),
    );

    // Services
    let card_service = CardService::new(board_store, engine);
    let rule_service = RuleService::new(rule_repo, audit_log);

    // HTTP
    let app = router::build(AppState::new(card_service, rule_service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, on_action_failure = %policy, "cardflowd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("cardflowd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
