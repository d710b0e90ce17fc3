//! Action: one mutation a rule performs on the triggering card.

use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, parse_iso8601};

/// The kind of mutation an [`Action`] performs.
///
/// Type names stored by older or newer versions of the board application
/// that this build does not know are kept in [`ActionType::Unrecognized`]
/// so the engine can report them instead of failing to load the rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    ArchiveCard,
    MarkAsDone,
    AddLabel,
    RemoveLabel,
    MoveCard,
    AssignMember,
    SetDueDate,
    Unrecognized(String),
}

impl ActionType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ArchiveCard => "ARCHIVE_CARD",
            Self::MarkAsDone => "MARK_AS_DONE",
            Self::AddLabel => "ADD_LABEL",
            Self::RemoveLabel => "REMOVE_LABEL",
            Self::MoveCard => "MOVE_CARD",
            Self::AssignMember => "ASSIGN_MEMBER",
            Self::SetDueDate => "SET_DUE_DATE",
            Self::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for ActionType {
    fn from(value: &str) -> Self {
        match value {
            "ARCHIVE_CARD" => Self::ArchiveCard,
            "MARK_AS_DONE" => Self::MarkAsDone,
            "ADD_LABEL" => Self::AddLabel,
            "REMOVE_LABEL" => Self::RemoveLabel,
            "MOVE_CARD" => Self::MoveCard,
            "ASSIGN_MEMBER" => Self::AssignMember,
            "SET_DUE_DATE" => Self::SetDueDate,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::Unrecognized(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single step of a rule: what to do, plus its optional argument.
///
/// The meaning of `value` depends on `action_type` (label id, list id,
/// user id, or due date spec).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default)]
    pub value: Option<String>,
}

impl Action {
    #[must_use]
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(action_type: ActionType, value: impl Into<String>) -> Self {
        Self {
            action_type,
            value: Some(value.into()),
        }
    }

    /// The argument, treating a blank string as absent.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}({value})", self.action_type),
            None => write!(f, "{}", self.action_type),
        }
    }
}

/// Parsed argument of a `SET_DUE_DATE` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDateSpec {
    Today,
    Tomorrow,
    At(Timestamp),
}

impl DueDateSpec {
    /// Parse `"TODAY"`, `"TOMORROW"` or an ISO-8601 date.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "TODAY" => Some(Self::Today),
            "TOMORROW" => Some(Self::Tomorrow),
            other => parse_iso8601(other).map(Self::At),
        }
    }

    /// Resolve into a concrete timestamp relative to `now`.
    #[must_use]
    pub fn resolve(self, now: Timestamp) -> Timestamp {
        match self {
            Self::Today => now,
            Self::Tomorrow => now + TimeDelta::days(1),
            Self::At(ts) => ts,
        }
    }
}
