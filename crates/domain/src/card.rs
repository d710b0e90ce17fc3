//! Card: a unit of work living in a list on a board.
//!
//! Cards are created and moved by the board endpoints; automation rules
//! mutate them through [`CardPatch`] partial updates.

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, ValidationError};
use crate::id::{BoardId, CardId, ListId};
use crate::time::Timestamp;

/// A card on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub list_id: ListId,
    pub title: String,
    pub position: i64,
    pub archived: bool,
    pub is_done: bool,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Card {
    /// Create a builder for constructing a [`Card`].
    #[must_use]
    pub fn builder() -> CardBuilder {
        CardBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] when:
    /// - `title` is blank ([`ValidationError::EmptyTitle`])
    /// - `list_id` is blank ([`ValidationError::EmptyListId`])
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if self.list_id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyListId.into());
        }
        Ok(())
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &CardPatch) {
        if let Some(archived) = patch.archived {
            self.archived = archived;
        }
        if let Some(is_done) = patch.is_done {
            self.is_done = is_done;
        }
        if let Some(list_id) = &patch.list_id {
            self.list_id = list_id.clone();
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
    }
}

/// Step-by-step builder for [`Card`].
#[derive(Debug, Default)]
pub struct CardBuilder {
    id: Option<CardId>,
    board_id: Option<BoardId>,
    list_id: Option<ListId>,
    title: Option<String>,
    position: Option<i64>,
    created_at: Option<Timestamp>,
}

impl CardBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<CardId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn board_id(mut self, board_id: impl Into<BoardId>) -> Self {
        self.board_id = Some(board_id.into());
        self
    }

    #[must_use]
    pub fn list_id(mut self, list_id: impl Into<ListId>) -> Self {
        self.list_id = Some(list_id.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return a [`Card`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] if the title or list is missing.
    pub fn build(self) -> Result<Card, BoardError> {
        let card = Card {
            id: self.id.unwrap_or_default(),
            board_id: self.board_id.unwrap_or_default(),
            list_id: self.list_id.unwrap_or_else(|| ListId::from("")),
            title: self.title.unwrap_or_default(),
            position: self.position.unwrap_or(0),
            archived: false,
            is_done: false,
            due_date: None,
            created_at: self.created_at.unwrap_or_else(crate::time::now),
        };
        card.validate()?;
        Ok(card)
    }
}

/// Partial update of card fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
}

impl CardPatch {
    #[must_use]
    pub fn archived() -> Self {
        Self {
            archived: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn done() -> Self {
        Self {
            is_done: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn move_to(list_id: ListId) -> Self {
        Self {
            list_id: Some(list_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn due(due_date: Timestamp) -> Self {
        Self {
            due_date: Some(due_date),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
