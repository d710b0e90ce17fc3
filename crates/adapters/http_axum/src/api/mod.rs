//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod cards;
#[allow(clippy::missing_errors_doc)]
pub mod rules;

use axum::Router;
use axum::routing::{get, post};

use cardflow_app::ports::{AuditLogSink, CardRepository, RuleRepository, TriggerDispatcher};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<CR, D, RR, L>() -> Router<AppState<CR, D, RR, L>>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    Router::new()
        // Cards
        .route(
            "/boards/{board_id}/cards",
            post(cards::create::<CR, D, RR, L>),
        )
        .route("/cards/{card_id}", get(cards::get::<CR, D, RR, L>))
        .route(
            "/cards/{card_id}/move",
            post(cards::move_card::<CR, D, RR, L>),
        )
        // Rules
        .route(
            "/boards/{board_id}/rules",
            get(rules::list::<CR, D, RR, L>).post(rules::create::<CR, D, RR, L>),
        )
        .route(
            "/rules/{rule_id}",
            get(rules::get::<CR, D, RR, L>).delete(rules::delete::<CR, D, RR, L>),
        )
        .route(
            "/rules/{rule_id}/active",
            post(rules::set_active::<CR, D, RR, L>),
        )
        .route("/rules/{rule_id}/logs", get(rules::logs::<CR, D, RR, L>))
}
