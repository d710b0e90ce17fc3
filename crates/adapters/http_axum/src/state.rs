//! Shared application state for axum handlers.

use std::sync::Arc;

use cardflow_app::services::card_service::CardService;
use cardflow_app::services::rule_service::RuleService;

/// Application state shared across all axum handlers.
///
/// Generic over the card repository, trigger dispatcher, rule repository and
/// audit log to avoid dynamic dispatch. `Clone` is implemented manually so
/// the underlying types themselves do not need to be `Clone`.
pub struct AppState<CR, D, RR, L> {
    /// Card use-cases; firing triggers goes through here.
    pub card_service: Arc<CardService<CR, D>>,
    /// Rule management and audit trail reads.
    pub rule_service: Arc<RuleService<RR, L>>,
}

impl<CR, D, RR, L> Clone for AppState<CR, D, RR, L> {
    fn clone(&self) -> Self {
        Self {
            card_service: Arc::clone(&self.card_service),
            rule_service: Arc::clone(&self.rule_service),
        }
    }
}

impl<CR, D, RR, L> AppState<CR, D, RR, L> {
    /// Create a new application state from service instances.
    pub fn new(card_service: CardService<CR, D>, rule_service: RuleService<RR, L>) -> Self {
        Self {
            card_service: Arc::new(card_service),
            rule_service: Arc::new(rule_service),
        }
    }
}
