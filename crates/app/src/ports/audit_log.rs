//! Audit log port: append-only record of rule executions.

use std::future::Future;
use std::sync::Arc;

use cardflow_domain::automation::{AutomationLog, LogStatus};
use cardflow_domain::error::BoardError;
use cardflow_domain::id::RuleId;

/// Sink for [`AutomationLog`] entries.
pub trait AuditLogSink {
    /// Append one entry for a rule execution and return it.
    fn append_log(
        &self,
        rule_id: &RuleId,
        status: LogStatus,
        message: &str,
    ) -> impl Future<Output = Result<AutomationLog, BoardError>> + Send;

    /// Most recent entries of a rule, newest first.
    fn find_by_rule(
        &self,
        rule_id: &RuleId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationLog>, BoardError>> + Send;
}

impl<T: AuditLogSink + Send + Sync> AuditLogSink for Arc<T> {
    fn append_log(
        &self,
        rule_id: &RuleId,
        status: LogStatus,
        message: &str,
    ) -> impl Future<Output = Result<AutomationLog, BoardError>> + Send {
        (**self).append_log(rule_id, status, message)
    }

    fn find_by_rule(
        &self,
        rule_id: &RuleId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationLog>, BoardError>> + Send {
        (**self).find_by_rule(rule_id, limit)
    }
}
