//! Automation engine: dispatches board events to matching rules.
//!
//! For each trigger the engine loads the board's active rules for that
//! trigger type, keeps the ones watching the event's list, and runs each
//! rule's actions in order through the [`ActionExecutor`]. Every matched rule
//! gets exactly one audit entry. Rules are isolated from each other: a
//! failing rule never stops the next one.
//!
//! All IO is awaited sequentially, so audit entries appear in rule order and
//! an action's write completes before the next action starts. Nothing is
//! transactional: writes from earlier actions of a failed rule stay applied.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use cardflow_domain::automation::{AutomationRule, LogStatus, TriggerEvent};
use cardflow_domain::id::CardId;

use crate::action_executor::ActionExecutor;
use crate::ports::{AuditLogSink, BoardMutationStore, RuleRepository, TriggerDispatcher};

const NO_ACTIONS: &str = "No actions to execute.";

/// What a rule does when one of its actions fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionFailurePolicy {
    /// Skip the remaining actions and log the failure.
    #[default]
    StopOnFailure,
    /// Run the remaining actions anyway; the rule still logs the first failure.
    ContinueOnFailure,
}

impl FromStr for ActionFailurePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stop" => Ok(Self::StopOnFailure),
            "continue" => Ok(Self::ContinueOnFailure),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ActionFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopOnFailure => f.write_str("stop"),
            Self::ContinueOnFailure => f.write_str("continue"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown action failure policy `{0}` (expected `stop` or `continue`)")]
pub struct UnknownPolicy(String);

/// Final status and audit message of one rule execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub status: LogStatus,
    pub message: String,
}

impl RuleOutcome {
    fn success(message: impl Into<String>) -> Self {
        Self {
            status: LogStatus::Success,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            status: LogStatus::Failure,
            message: message.into(),
        }
    }
}

/// Rule engine wired to a rule store, a mutation store and an audit log.
pub struct AutomationEngine<RR, S, L> {
    rules: RR,
    executor: ActionExecutor<S>,
    audit: L,
    policy: ActionFailurePolicy,
}

impl<RR, S, L> AutomationEngine<RR, S, L>
where
    RR: RuleRepository,
    S: BoardMutationStore,
    L: AuditLogSink,
{
    /// Create an engine with the default [`ActionFailurePolicy`].
    pub fn new(rules: RR, store: S, audit: L) -> Self {
        Self {
            rules,
            executor: ActionExecutor::new(store),
            audit,
            policy: ActionFailurePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ActionFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ActionFailurePolicy {
        self.policy
    }

    /// Run every rule matching `event`.
    ///
    /// Never fails: a rule store failure is reported on the operational log
    /// and turns the firing into a no-op; rule outcomes go to the audit log.
    #[tracing::instrument(
        skip(self, event),
        fields(
            board_id = %event.board_id,
            trigger_type = %event.trigger_type,
            trigger_val = %event.trigger_val,
            card_id = %event.context.card_id,
        )
    )]
    pub async fn process_trigger(&self, event: &TriggerEvent) {
        let rules = match self
            .rules
            .find_active_rules(&event.board_id, event.trigger_type)
            .await
        {
            Ok(rules) => rules,
            Err(err) => {
                tracing::error!(error = %err, "failed to load automation rules");
                return;
            }
        };

        for rule in rules.iter().filter(|rule| rule.matches(event)) {
            let outcome = self.run_rule(rule, event.card_id()).await;
            self.record(rule, &outcome).await;
        }
    }

    /// Execute a rule's actions in order and summarize the result.
    pub async fn run_rule(&self, rule: &AutomationRule, card_id: &CardId) -> RuleOutcome {
        let mut last_success = None;
        let mut first_failure = None;

        for action in &rule.actions {
            match self.executor.execute(action, card_id).await {
                Ok(message) => {
                    tracing::debug!(rule_id = %rule.id, %action, %message, "action applied");
                    last_success = Some(message);
                }
                Err(failure) => {
                    tracing::debug!(rule_id = %rule.id, %action, error = %failure, "action failed");
                    first_failure.get_or_insert_with(|| failure.to_string());
                    if self.policy == ActionFailurePolicy::StopOnFailure {
                        break;
                    }
                }
            }
        }

        match (first_failure, last_success) {
            (Some(message), _) => RuleOutcome::failure(message),
            (None, Some(message)) => RuleOutcome::success(message),
            (None, None) => RuleOutcome::success(NO_ACTIONS),
        }
    }

    async fn record(&self, rule: &AutomationRule, outcome: &RuleOutcome) {
        match outcome.status {
            LogStatus::Success => {
                tracing::info!(rule_id = %rule.id, message = %outcome.message, "automation rule succeeded");
            }
            LogStatus::Failure => {
                tracing::warn!(rule_id = %rule.id, message = %outcome.message, "automation rule failed");
            }
        }
        if let Err(err) = self
            .audit
            .append_log(&rule.id, outcome.status, &outcome.message)
            .await
        {
            tracing::error!(rule_id = %rule.id, error = %err, "failed to write automation log");
        }
    }
}

impl<RR, S, L> TriggerDispatcher for AutomationEngine<RR, S, L>
where
    RR: RuleRepository + Send + Sync,
    S: BoardMutationStore + Send + Sync,
    L: AuditLogSink + Send + Sync,
{
    fn process_trigger(&self, event: &TriggerEvent) -> impl Future<Output = ()> + Send {
        Self::process_trigger(self, event)
    }
}
