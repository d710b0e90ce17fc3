//! Rule store port: persistence for automation rules.

use std::future::Future;
use std::sync::Arc;

use cardflow_domain::automation::{AutomationRule, TriggerType};
use cardflow_domain::error::BoardError;
use cardflow_domain::id::{BoardId, RuleId};

/// Repository for persisting and querying [`AutomationRule`]s.
///
/// Every returned rule carries its actions in declaration order.
pub trait RuleRepository {
    /// Active rules of `board_id` listening to `trigger_type`, in creation order.
    fn find_active_rules(
        &self,
        board_id: &BoardId,
        trigger_type: TriggerType,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardError>> + Send;

    /// Persist a new rule together with its actions.
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, BoardError>> + Send;

    fn get_by_id(
        &self,
        id: &RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, BoardError>> + Send;

    /// All rules of a board, active or not, in creation order.
    fn find_by_board(
        &self,
        board_id: &BoardId,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardError>> + Send;

    /// Toggle a rule. Returns `false` when no rule with `id` exists.
    fn set_active(
        &self,
        id: &RuleId,
        is_active: bool,
    ) -> impl Future<Output = Result<bool, BoardError>> + Send;

    /// Delete a rule, its actions and its audit trail.
    fn delete(&self, id: &RuleId) -> impl Future<Output = Result<(), BoardError>> + Send;
}

impl<T: RuleRepository + Send + Sync> RuleRepository for Arc<T> {
    fn find_active_rules(
        &self,
        board_id: &BoardId,
        trigger_type: TriggerType,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardError>> + Send {
        (**self).find_active_rules(board_id, trigger_type)
    }

    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, BoardError>> + Send {
        (**self).create(rule)
    }

    fn get_by_id(
        &self,
        id: &RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, BoardError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_board(
        &self,
        board_id: &BoardId,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, BoardError>> + Send {
        (**self).find_by_board(board_id)
    }

    fn set_active(
        &self,
        id: &RuleId,
        is_active: bool,
    ) -> impl Future<Output = Result<bool, BoardError>> + Send {
        (**self).set_active(id, is_active)
    }

    fn delete(&self, id: &RuleId) -> impl Future<Output = Result<(), BoardError>> + Send {
        (**self).delete(id)
    }
}
