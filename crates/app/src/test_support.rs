//! In-memory port implementations shared by the app-layer unit tests.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Mutex;

use cardflow_domain::automation::{
    AutomationLog, AutomationRule, LogStatus, TriggerEvent, TriggerType,
};
use cardflow_domain::card::{Card, CardPatch};
use cardflow_domain::error::{BoardError, ConflictError, NotFoundError};
use cardflow_domain::id::{BoardId, CardId, LabelId, RuleId, UserId};

use crate::ports::{
    AuditLogSink, BoardMutationStore, CardRepository, RuleRepository, TriggerDispatcher,
};

fn injected(call: StoreCall) -> BoardError {
    BoardError::Storage(Box::new(std::io::Error::other(format!(
        "injected {call:?} failure"
    ))))
}

// ── Board store ────────────────────────────────────────────────────

/// Mutation store methods, used to record calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    UpdateCard,
    CreateCardLabel,
    DeleteCardLabel,
    CreateCardMember,
}

#[derive(Default)]
pub struct InMemoryBoard {
    cards: Mutex<HashMap<CardId, Card>>,
    labels: Mutex<BTreeSet<(CardId, LabelId)>>,
    members: Mutex<BTreeSet<(CardId, UserId)>>,
    calls: Mutex<Vec<StoreCall>>,
    failing: Mutex<Vec<StoreCall>>,
}

impl InMemoryBoard {
    pub fn with_card(card_id: &str, list_id: &str) -> Self {
        let board = Self::default();
        board.insert(
            Card::builder()
                .id(card_id)
                .board_id("board-1")
                .list_id(list_id)
                .title("Test card")
                .build()
                .unwrap(),
        );
        board
    }

    pub fn insert(&self, card: Card) {
        self.cards.lock().unwrap().insert(card.id.clone(), card);
    }

    /// Make every subsequent `call` fail with a storage error.
    pub fn fail_on(&self, call: StoreCall) {
        self.failing.lock().unwrap().push(call);
    }

    pub fn card(&self, id: &CardId) -> Card {
        self.cards.lock().unwrap().get(id).cloned().unwrap()
    }

    pub fn labels(&self, id: &CardId) -> Vec<LabelId> {
        let labels = self.labels.lock().unwrap();
        labels
            .iter()
            .filter(|(card, _)| card == id)
            .map(|(_, label)| label.clone())
            .collect()
    }

    pub fn members(&self, id: &CardId) -> Vec<UserId> {
        let members = self.members.lock().unwrap();
        members
            .iter()
            .filter(|(card, _)| card == id)
            .map(|(_, user)| user.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> Result<(), BoardError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&call) {
            return Err(injected(call));
        }
        Ok(())
    }
}

impl BoardMutationStore for InMemoryBoard {
    fn update_card(
        &self,
        card_id: &CardId,
        patch: &CardPatch,
    ) -> impl Future<Output = Result<(), BoardError>> + Send {
        let result = self.record(StoreCall::UpdateCard).and_then(|()| {
            let mut cards = self.cards.lock().unwrap();
            let card = cards.get_mut(card_id).ok_or_else(|| NotFoundError {
                entity: "Card",
                id: card_id.to_string(),
            })?;
            card.apply(patch);
            Ok(())
        });
        async { result }
    }

    fn create_card_label(
        &self,
        card_id: &CardId,
        label_id: &LabelId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send {
        let result = self.record(StoreCall::CreateCardLabel).and_then(|()| {
            let inserted = self
                .labels
                .lock()
                .unwrap()
                .insert((card_id.clone(), label_id.clone()));
            if inserted {
                Ok(())
            } else {
                Err(ConflictError {
                    entity: "CardLabel",
                    key: format!("{card_id}/{label_id}"),
                }
                .into())
            }
        });
        async { result }
    }

    fn delete_card_label(
        &self,
        card_id: &CardId,
        label_id: &LabelId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send {
        let result = self.record(StoreCall::DeleteCardLabel).map(|()| {
            self.labels
                .lock()
                .unwrap()
                .remove(&(card_id.clone(), label_id.clone()));
        });
        async { result }
    }

    fn create_card_member(
        &self,
        card_id: &CardId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send {
        let result = self.record(StoreCall::CreateCardMember).and_then(|()| {
            let inserted = self
                .members
                .lock()
                .unwrap()
                .insert((card_id.clone(), user_id.clone()));
            if inserted {
                Ok(())
            } else {
                Err(ConflictError {
                    entity: "CardMember",
                    key: format!("{card_id}/{user_id}"),
                }
                .into())
            }
        });
        async { result }
    }
}

impl CardRepository for InMemoryBoard {
    fn create(&self, card: Card) -> impl Future<Output = Result<Card, BoardError>> + Send {
        self.insert(card.clone());
        async { Ok(card) }
    }

    fn get_by_id(
        &self,
        id: &CardId,
    ) -> impl Future<Output = Result<Option<Card>, BoardError>> + Send {
        let result = self.cards.lock().unwrap().get(id).cloned();
        async { Ok(result) }
    }

    fn update(&self, card: Card) -> impl Future<Output = Result<Card, BoardError>> + Send {
        self.insert(card.clone());
        async { Ok(card) }
    }

    fn labels_of(
        &self,
        card_id: &CardId,
    ) -> impl Future<Output = Result<Vec<LabelId>, BoardError>> + Send {
        let result = self.labels(card_id);
        async { Ok(result) }
    }

    fn members_of(
        &self,
        card_id: &CardId,
    ) -> impl Future<Output = Result<Vec<UserId>, BoardError>> + Send {
        let result = self.members(card_id);
        async { Ok(result) }
    }
}

// ── Rule store ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRules {
    rules: Mutex<Vec<AutomationRule>>,
    unavailable: Mutex<bool>,
    queries: Mutex<usize>,
}

impl InMemoryRules {
    pub fn with(rules: Vec<AutomationRule>) -> Self {
        Self {
            rules: Mutex::new(rules),
            ..Self::default()
        }
    }

    /// Make every query fail as if storage were down.
    pub fn go_down(&self) {
        *self.unavailable.lock().unwrap() = true;
    }

    pub fn queries(&self) -> usize {
        *self.queries.lock().unwrap()
    }

    fn check(&self) -> Result<(), BoardError> {
        *self.queries.lock().unwrap() += 1;
        if *self.unavailable.lock().unwrap() {
            return Err(BoardError::Storage(Box::new(std::io::Error::other(
                "rule store unavailable",
            ))));
        }
        Ok(())
    }
}

impl RuleRepository for InMemoryRules {
    fn find_active_rules(
        &self,
        board_id: &BoardId,
        trigger_type: TriggerType,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardError>> + Send {
        let result = self.check().map(|()| {
            self.rules
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.is_active && &r.board_id == board_id && r.trigger_type == trigger_type
                })
                .cloned()
                .collect()
        });
        async { result }
    }

    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, BoardError>> + Send {
        let result = self.check().map(|()| {
            self.rules.lock().unwrap().push(rule.clone());
            rule
        });
        async { result }
    }

    fn get_by_id(
        &self,
        id: &RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, BoardError>> + Send {
        let result = self
            .check()
            .map(|()| self.rules.lock().unwrap().iter().find(|r| &r.id == id).cloned());
        async { result }
    }

    fn find_by_board(
        &self,
        board_id: &BoardId,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardError>> + Send {
        let result = self.check().map(|()| {
            self.rules
                .lock()
                .unwrap()
                .iter()
                .filter(|r| &r.board_id == board_id)
                .cloned()
                .collect()
        });
        async { result }
    }

    fn set_active(
        &self,
        id: &RuleId,
        is_active: bool,
    ) -> impl Future<Output = Result<bool, BoardError>> + Send {
        let result = self.check().map(|()| {
            let mut rules = self.rules.lock().unwrap();
            match rules.iter_mut().find(|r| &r.id == id) {
                Some(rule) => {
                    rule.is_active = is_active;
                    true
                }
                None => false,
            }
        });
        async { result }
    }

    fn delete(&self, id: &RuleId) -> impl Future<Output = Result<(), BoardError>> + Send {
        let result = self.check().map(|()| {
            self.rules.lock().unwrap().retain(|r| &r.id != id);
        });
        async { result }
    }
}

// ── Audit log ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct SpyAuditLog {
    entries: Mutex<Vec<AutomationLog>>,
    failing_rules: Mutex<Vec<RuleId>>,
}

impl SpyAuditLog {
    /// Make appends for `rule_id` fail.
    pub fn fail_for(&self, rule_id: &str) {
        self.failing_rules.lock().unwrap().push(RuleId::from(rule_id));
    }

    pub fn entries(&self) -> Vec<AutomationLog> {
        self.entries.lock().unwrap().clone()
    }

    /// `(rule_id, status, message)` triples in append order.
    pub fn summary(&self) -> Vec<(String, LogStatus, String)> {
        self.entries()
            .into_iter()
            .map(|log| (log.rule_id.into_inner(), log.status, log.message))
            .collect()
    }
}

impl AuditLogSink for SpyAuditLog {
    fn append_log(
        &self,
        rule_id: &RuleId,
        status: LogStatus,
        message: &str,
    ) -> impl Future<Output = Result<AutomationLog, BoardError>> + Send {
        let result = if self.failing_rules.lock().unwrap().contains(rule_id) {
            Err(BoardError::Storage(Box::new(std::io::Error::other(
                "audit log unavailable",
            ))))
        } else {
            let log = AutomationLog::new(rule_id.clone(), status, message);
            self.entries.lock().unwrap().push(log.clone());
            Ok(log)
        };
        async { result }
    }

    fn find_by_rule(
        &self,
        rule_id: &RuleId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationLog>, BoardError>> + Send {
        let result: Vec<_> = self
            .entries()
            .into_iter()
            .rev()
            .filter(|log| &log.rule_id == rule_id)
            .take(limit)
            .collect();
        async { Ok(result) }
    }
}

// ── Dispatcher ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct SpyDispatcher {
    events: Mutex<Vec<TriggerEvent>>,
}

impl SpyDispatcher {
    pub fn events(&self) -> Vec<TriggerEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TriggerDispatcher for SpyDispatcher {
    fn process_trigger(&self, event: &TriggerEvent) -> impl Future<Output = ()> + Send {
        self.events.lock().unwrap().push(event.clone());
        async {}
    }
}
