//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use cardflow_app::ports::{AuditLogSink, CardRepository, RuleRepository, TriggerDispatcher};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level.
pub fn build<CR, D, RR, L>(state: AppState<CR, D, RR, L>) -> Router
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
