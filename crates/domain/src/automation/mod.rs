//! Automation: trigger → ordered action rules scoped to one board.
//!
//! A rule listens for one [`TriggerType`] on one list of its board. When a
//! matching [`TriggerEvent`] fires, its [`Action`]s run in order against the
//! triggering card and one [`AutomationLog`] records the outcome.

mod action;
mod log;
mod trigger;

pub use action::{Action, ActionType, DueDateSpec};
pub use log::{AutomationLog, LogStatus};
pub use trigger::{TriggerContext, TriggerEvent, TriggerType};

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, ValidationError};
use crate::id::{BoardId, ListId, RuleId};
use crate::time::Timestamp;

/// A persisted trigger condition plus the actions to run when it fires.
///
/// Rules are immutable values from the engine's point of view: they are
/// loaded once per trigger firing and never modified during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    pub board_id: BoardId,
    #[serde(default)]
    pub name: Option<String>,
    pub trigger_type: TriggerType,
    /// The list the trigger watches.
    pub trigger_val: ListId,
    pub is_active: bool,
    pub actions: Vec<Action>,
    pub created_at: Timestamp,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] when `trigger_val` is blank.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.trigger_val.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyTriggerValue.into());
        }
        Ok(())
    }

    /// Whether this rule should run for `event`.
    ///
    /// Requires an active rule on the same board, listening to the same
    /// trigger type, on exactly the same list.
    #[must_use]
    pub fn matches(&self, event: &TriggerEvent) -> bool {
        self.is_active
            && self.board_id == event.board_id
            && self.trigger_type == event.trigger_type
            && self.trigger_val == event.trigger_val
    }
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    board_id: Option<BoardId>,
    name: Option<String>,
    trigger_type: Option<TriggerType>,
    trigger_val: Option<ListId>,
    is_active: Option<bool>,
    actions: Vec<Action>,
    created_at: Option<Timestamp>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<RuleId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn board_id(mut self, board_id: impl Into<BoardId>) -> Self {
        self.board_id = Some(board_id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger_type: TriggerType, list_id: impl Into<ListId>) -> Self {
        self.trigger_type = Some(trigger_type);
        self.trigger_val = Some(list_id.into());
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// Defaults: active, `CARD_MOVED_TO_LIST`, created now.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] if no trigger list was given.
    pub fn build(self) -> Result<AutomationRule, BoardError> {
        let rule = AutomationRule {
            id: self.id.unwrap_or_default(),
            board_id: self.board_id.unwrap_or_default(),
            name: self.name,
            trigger_type: self.trigger_type.unwrap_or(TriggerType::CardMovedToList),
            trigger_val: self.trigger_val.unwrap_or_else(|| ListId::from("")),
            is_active: self.is_active.unwrap_or(true),
            actions: self.actions,
            created_at: self.created_at.unwrap_or_else(crate::time::now),
        };
        rule.validate()?;
        Ok(rule)
    }
}
