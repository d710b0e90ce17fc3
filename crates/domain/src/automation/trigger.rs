//! Trigger: the board event pattern that activates a rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{BoardId, CardId, ListId};

/// Kind of board event a rule listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    /// A card landed in a list it was not in before.
    CardMovedToList,
    /// A card was created in a list.
    CardCreated,
}

impl TriggerType {
    /// Stable wire/storage name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CardMovedToList => "CARD_MOVED_TO_LIST",
            Self::CardCreated => "CARD_CREATED",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CARD_MOVED_TO_LIST" => Ok(Self::CardMovedToList),
            "CARD_CREATED" => Ok(Self::CardCreated),
            other => Err(ValidationError::UnknownTriggerType(other.to_string())),
        }
    }
}

/// Data about the card that caused the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub card_id: CardId,
}

/// An ephemeral board event handed to the automation engine.
///
/// `trigger_val` is the list the card was created in or moved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub board_id: BoardId,
    pub trigger_type: TriggerType,
    pub trigger_val: ListId,
    pub context: TriggerContext,
}

impl TriggerEvent {
    #[must_use]
    pub fn new(
        board_id: BoardId,
        trigger_type: TriggerType,
        trigger_val: ListId,
        card_id: CardId,
    ) -> Self {
        Self {
            board_id,
            trigger_type,
            trigger_val,
            context: TriggerContext { card_id },
        }
    }

    /// Event fired after a card was created in `list_id`.
    #[must_use]
    pub fn card_created(board_id: BoardId, list_id: ListId, card_id: CardId) -> Self {
        Self::new(board_id, TriggerType::CardCreated, list_id, card_id)
    }

    /// Event fired after a card was moved into `list_id`.
    #[must_use]
    pub fn card_moved(board_id: BoardId, list_id: ListId, card_id: CardId) -> Self {
        Self::new(board_id, TriggerType::CardMovedToList, list_id, card_id)
    }

    #[must_use]
    pub fn card_id(&self) -> &CardId {
        &self.context.card_id
    }
}
