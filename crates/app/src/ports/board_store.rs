//! Board store ports: cards and their label/member associations.

use std::future::Future;
use std::sync::Arc;

use cardflow_domain::card::{Card, CardPatch};
use cardflow_domain::error::BoardError;
use cardflow_domain::id::{CardId, LabelId, UserId};

/// Primitive mutations the automation engine applies to cards.
///
/// Each call is an independent write; nothing spans several calls.
pub trait BoardMutationStore {
    /// Apply a partial update to a card.
    ///
    /// Returns [`BoardError::NotFound`] when the card does not exist.
    fn update_card(
        &self,
        card_id: &CardId,
        patch: &CardPatch,
    ) -> impl Future<Output = Result<(), BoardError>> + Send;

    /// Attach a label to a card.
    ///
    /// Must return [`BoardError::Conflict`] when the pair already exists,
    /// and only in that case.
    fn create_card_label(
        &self,
        card_id: &CardId,
        label_id: &LabelId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send;

    /// Detach a label from a card. Succeeds when the pair does not exist.
    fn delete_card_label(
        &self,
        card_id: &CardId,
        label_id: &LabelId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send;

    /// Assign a member to a card.
    ///
    /// Must return [`BoardError::Conflict`] when the pair already exists.
    fn create_card_member(
        &self,
        card_id: &CardId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send;
}

/// Card persistence used by the card endpoints that fire triggers.
pub trait CardRepository {
    fn create(&self, card: Card) -> impl Future<Output = Result<Card, BoardError>> + Send;

    fn get_by_id(
        &self,
        id: &CardId,
    ) -> impl Future<Output = Result<Option<Card>, BoardError>> + Send;

    /// Overwrite a card's mutable fields.
    fn update(&self, card: Card) -> impl Future<Output = Result<Card, BoardError>> + Send;

    /// Labels attached to a card, sorted by id.
    fn labels_of(
        &self,
        card_id: &CardId,
    ) -> impl Future<Output = Result<Vec<LabelId>, BoardError>> + Send;

    /// Members assigned to a card, sorted by id.
    fn members_of(
        &self,
        card_id: &CardId,
    ) -> impl Future<Output = Result<Vec<UserId>, BoardError>> + Send;
}

impl<T: BoardMutationStore + Send + Sync> BoardMutationStore for Arc<T> {
    fn update_card(
        &self,
        card_id: &CardId,
        patch: &CardPatch,
    ) -> impl Future<Output = Result<(), BoardError>> + Send {
        (**self).update_card(card_id, patch)
    }

    fn create_card_label(
        &self,
        card_id: &CardId,
        label_id: &LabelId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send {
        (**self).create_card_label(card_id, label_id)
    }

    fn delete_card_label(
        &self,
        card_id: &CardId,
        label_id: &LabelId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send {
        (**self).delete_card_label(card_id, label_id)
    }

    fn create_card_member(
        &self,
        card_id: &CardId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), BoardError>> + Send {
        (**self).create_card_member(card_id, user_id)
    }
}

impl<T: CardRepository + Send + Sync> CardRepository for Arc<T> {
    fn create(&self, card: Card) -> impl Future<Output = Result<Card, BoardError>> + Send {
        (**self).create(card)
    }

    fn get_by_id(
        &self,
        id: &CardId,
    ) -> impl Future<Output = Result<Option<Card>, BoardError>> + Send {
        (**self).get_by_id(id)
    }

    fn update(&self, card: Card) -> impl Future<Output = Result<Card, BoardError>> + Send {
        (**self).update(card)
    }

    fn labels_of(
        &self,
        card_id: &CardId,
    ) -> impl Future<Output = Result<Vec<LabelId>, BoardError>> + Send {
        (**self).labels_of(card_id)
    }

    fn members_of(
        &self,
        card_id: &CardId,
    ) -> impl Future<Output = Result<Vec<UserId>, BoardError>> + Send {
        (**self).members_of(card_id)
    }
}
