//! Audit log: one append-only record per rule execution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{LogId, RuleId};
use crate::time::Timestamp;

/// Outcome of one rule execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogStatus {
    Success,
    Failure,
}

impl LogStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            "FAILURE" => Ok(Self::Failure),
            other => Err(ValidationError::UnknownLogStatus(other.to_string())),
        }
    }
}

/// An audit entry written after a matched rule ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationLog {
    pub id: LogId,
    pub rule_id: RuleId,
    pub status: LogStatus,
    pub message: String,
    pub created_at: Timestamp,
}

impl AutomationLog {
    /// Create a new entry stamped with the current time.
    #[must_use]
    pub fn new(rule_id: RuleId, status: LogStatus, message: impl Into<String>) -> Self {
        Self {
            id: LogId::new(),
            rule_id,
            status,
            message: message.into(),
            created_at: crate::time::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_status_through_str() {
        for status in [LogStatus::Success, LogStatus::Failure] {
            assert_eq!(status.as_str().parse::<LogStatus>().unwrap(), status);
        }
    }

    #[test]
    fn should_reject_unknown_status() {
        assert!("PENDING".parse::<LogStatus>().is_err());
    }

    #[test]
    fn should_stamp_new_entry() {
        let rule_id = RuleId::from("rule-1");
        let log = AutomationLog::new(rule_id.clone(), LogStatus::Success, "Card card-1 archived.");
        assert_eq!(log.rule_id, rule_id);
        assert_eq!(log.status, LogStatus::Success);
        assert_eq!(log.message, "Card card-1 archived.");
    }
}
