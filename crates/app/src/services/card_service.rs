//! Card service: the card use-cases that fire automation triggers.
//!
//! Automation runs after the card write succeeded and cannot fail the
//! use-case: the dispatcher reports outcomes through the audit log only.

use cardflow_domain::automation::TriggerEvent;
use cardflow_domain::card::Card;
use cardflow_domain::error::{BoardError, NotFoundError};
use cardflow_domain::id::{BoardId, CardId, LabelId, ListId, UserId};

use crate::ports::{CardRepository, TriggerDispatcher};

/// A card together with its label and member associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub card: Card,
    pub labels: Vec<LabelId>,
    pub members: Vec<UserId>,
}

/// Application service for creating and moving cards.
pub struct CardService<R, D> {
    repo: R,
    dispatcher: D,
}

impl<R, D> CardService<R, D>
where
    R: CardRepository,
    D: TriggerDispatcher,
{
    /// Create a new service backed by `repo`, firing triggers into `dispatcher`.
    pub fn new(repo: R, dispatcher: D) -> Self {
        Self { repo, dispatcher }
    }

    /// Create a card in `list_id` and fire `CARD_CREATED` for that list.
    ///
    /// Returns the card as stored after automation ran.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] if the title or list is blank, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, title))]
    pub async fn create_card(
        &self,
        board_id: BoardId,
        list_id: ListId,
        title: String,
        position: Option<i64>,
    ) -> Result<Card, BoardError> {
        let mut builder = Card::builder()
            .board_id(board_id)
            .list_id(list_id)
            .title(title);
        if let Some(position) = position {
            builder = builder.position(position);
        }
        let card = self.repo.create(builder.build()?).await?;

        let event = TriggerEvent::card_created(
            card.board_id.clone(),
            card.list_id.clone(),
            card.id.clone(),
        );
        self.dispatcher.process_trigger(&event).await;

        self.reload(card).await
    }

    /// Move a card to `list_id` (and optionally a new position).
    ///
    /// Fires `CARD_MOVED_TO_LIST` only when the list actually changes; a
    /// reorder inside the same list fires nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] if the card does not exist, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn move_card(
        &self,
        card_id: &CardId,
        list_id: ListId,
        position: Option<i64>,
    ) -> Result<Card, BoardError> {
        let mut card = self.get_card(card_id).await?;
        let list_changed = card.list_id != list_id;
        card.list_id = list_id;
        if let Some(position) = position {
            card.position = position;
        }
        let card = self.repo.update(card).await?;

        if !list_changed {
            return Ok(card);
        }

        let event = TriggerEvent::card_moved(
            card.board_id.clone(),
            card.list_id.clone(),
            card.id.clone(),
        );
        self.dispatcher.process_trigger(&event).await;

        self.reload(card).await
    }

    /// Look up a card by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] when no card with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_card(&self, id: &CardId) -> Result<Card, BoardError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Card",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Look up a card with its labels and members.
    ///
    /// # Errors
    ///
    /// Same as [`get_card`](Self::get_card).
    pub async fn get_card_details(&self, id: &CardId) -> Result<CardDetails, BoardError> {
        let card = self.get_card(id).await?;
        let labels = self.repo.labels_of(id).await?;
        let members = self.repo.members_of(id).await?;
        Ok(CardDetails {
            card,
            labels,
            members,
        })
    }

    /// Re-read a card after automation, falling back to `card` if a rule
    /// removed it in the meantime.
    async fn reload(&self, card: Card) -> Result<Card, BoardError> {
        Ok(self.repo.get_by_id(&card.id).await?.unwrap_or(card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation_engine::AutomationEngine;
    use crate::test_support::{InMemoryBoard, InMemoryRules, SpyAuditLog, SpyDispatcher};
    use cardflow_domain::automation::{Action, ActionType, AutomationRule, TriggerType};
    use cardflow_domain::error::ValidationError;
    use std::sync::Arc;

    fn service() -> CardService<InMemoryBoard, SpyDispatcher> {
        CardService::new(
            InMemoryBoard::with_card("card-1", "list-1"),
            SpyDispatcher::default(),
        )
    }

    #[tokio::test]
    async fn should_fire_card_created_for_new_card() {
        let svc = service();
        let card = svc
            .create_card(
                BoardId::from("board-1"),
                ListId::from("list-todo"),
                "Ship it".to_string(),
                None,
            )
            .await
            .unwrap();

        let events = svc.dispatcher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].trigger_type, TriggerType::CardCreated);
        assert_eq!(events[0].trigger_val.as_str(), "list-todo");
        assert_eq!(events[0].board_id.as_str(), "board-1");
        assert_eq!(events[0].card_id(), &card.id);
    }

    #[tokio::test]
    async fn should_reject_blank_title_without_firing() {
        let svc = service();
        let result = svc
            .create_card(
                BoardId::from("board-1"),
                ListId::from("list-1"),
                " ".to_string(),
                None,
            )
            .await;
        assert!(matches!(
            result,
            Err(BoardError::Validation(ValidationError::EmptyTitle))
        ));
        assert!(svc.dispatcher.events().is_empty());
    }

    #[tokio::test]
    async fn should_fire_card_moved_when_list_changes() {
        let svc = service();
        let card = svc
            .move_card(&CardId::from("card-1"), ListId::from("list-2"), Some(3))
            .await
            .unwrap();

        assert_eq!(card.list_id.as_str(), "list-2");
        assert_eq!(card.position, 3);
        let events = svc.dispatcher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].trigger_type, TriggerType::CardMovedToList);
        assert_eq!(events[0].trigger_val.as_str(), "list-2");
    }

    #[tokio::test]
    async fn should_not_fire_when_reordering_within_same_list() {
        let svc = service();
        let card = svc
            .move_card(&CardId::from("card-1"), ListId::from("list-1"), Some(7))
            .await
            .unwrap();

        assert_eq!(card.position, 7);
        assert!(svc.dispatcher.events().is_empty());
    }

    #[tokio::test]
    async fn should_return_not_found_when_moving_missing_card() {
        let svc = service();
        let result = svc
            .move_card(&CardId::from("ghost"), ListId::from("list-2"), None)
            .await;
        assert!(matches!(result, Err(BoardError::NotFound(_))));
        assert!(svc.dispatcher.events().is_empty());
    }

    #[tokio::test]
    async fn should_return_card_as_left_by_automation() {
        let rule = AutomationRule::builder()
            .board_id("board-1")
            .trigger(TriggerType::CardMovedToList, "list-done")
            .action(Action::new(ActionType::MarkAsDone))
            .action(Action::with_value(ActionType::AddLabel, "label-shipped"))
            .build()
            .unwrap();
        let board = Arc::new(InMemoryBoard::with_card("card-1", "list-1"));
        let engine = Arc::new(AutomationEngine::new(
            InMemoryRules::with(vec![rule]),
            Arc::clone(&board),
            SpyAuditLog::default(),
        ));
        let svc = CardService::new(Arc::clone(&board), engine);

        let card = svc
            .move_card(&CardId::from("card-1"), ListId::from("list-done"), None)
            .await
            .unwrap();
        assert!(card.is_done);

        let details = svc.get_card_details(&card.id).await.unwrap();
        assert_eq!(details.labels, vec![LabelId::from("label-shipped")]);
        assert!(details.members.is_empty());
    }
}
