//! Rule service: use-cases for managing automation rules and reading
//! their audit trail.

use cardflow_domain::automation::{AutomationLog, AutomationRule};
use cardflow_domain::error::{BoardError, NotFoundError};
use cardflow_domain::id::{BoardId, RuleId};

use crate::ports::{AuditLogSink, RuleRepository};

/// Application service for rule management.
pub struct RuleService<R, L> {
    repo: R,
    logs: L,
}

fn not_found(id: &RuleId) -> BoardError {
    NotFoundError {
        entity: "AutomationRule",
        id: id.to_string(),
    }
    .into()
}

impl<R: RuleRepository, L: AuditLogSink> RuleService<R, L> {
    /// Create a new service backed by the given rule store and audit log.
    pub fn new(repo: R, logs: L) -> Self {
        Self { repo, logs }
    }

    /// Persist a new rule.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] if the rule has no trigger list,
    /// or a storage error propagated from the repository.
    #[tracing::instrument(skip(self, rule), fields(board_id = %rule.board_id, trigger_type = %rule.trigger_type))]
    pub async fn create_rule(&self, rule: AutomationRule) -> Result<AutomationRule, BoardError> {
        rule.validate()?;
        self.repo.create(rule).await
    }

    /// Look up a rule by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] when no rule with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_rule(&self, id: &RuleId) -> Result<AutomationRule, BoardError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// List every rule of a board.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_rules(&self, board_id: &BoardId) -> Result<Vec<AutomationRule>, BoardError> {
        self.repo.find_by_board(board_id).await
    }

    /// Enable or disable a rule and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] when no rule with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn set_active(
        &self,
        id: &RuleId,
        is_active: bool,
    ) -> Result<AutomationRule, BoardError> {
        if !self.repo.set_active(id, is_active).await? {
            return Err(not_found(id));
        }
        self.get_rule(id).await
    }

    /// Delete a rule.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_rule(&self, id: &RuleId) -> Result<(), BoardError> {
        self.repo.delete(id).await
    }

    /// Most recent audit entries of a rule, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] when the rule does not exist,
    /// or a storage error.
    pub async fn recent_logs(
        &self,
        id: &RuleId,
        limit: usize,
    ) -> Result<Vec<AutomationLog>, BoardError> {
        self.get_rule(id).await?;
        self.logs.find_by_rule(id, limit).await
    }
}
