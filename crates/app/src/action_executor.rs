//! Action executor: performs exactly one rule action against one card.
//!
//! Every action maps to a single [`BoardMutationStore`] call. Success yields
//! a deterministic, human-readable message that ends up in the audit log;
//! failure yields an [`ActionFailure`] whose `Display` is the audit message.

use cardflow_domain::automation::{Action, ActionType, DueDateSpec};
use cardflow_domain::card::CardPatch;
use cardflow_domain::error::BoardError;
use cardflow_domain::id::{CardId, LabelId, ListId, UserId};
use cardflow_domain::time::now;

use crate::ports::BoardMutationStore;

/// Why an action could not be applied.
#[derive(Debug, thiserror::Error)]
pub enum ActionFailure {
    /// The action needs a `value` and none (or a blank one) was configured.
    #[error("Missing {what} in value for {action_type}.")]
    MissingValue {
        action_type: ActionType,
        what: &'static str,
    },

    #[error("Unknown action type: {0}.")]
    UnknownType(String),

    #[error("Invalid due date value: {0}.")]
    InvalidDueDate(String),

    /// The mutation store rejected the write.
    #[error("Failed to execute {action_type}: {source}.")]
    Store {
        action_type: ActionType,
        #[source]
        source: BoardError,
    },
}

/// Applies rule actions through a [`BoardMutationStore`].
pub struct ActionExecutor<S> {
    store: S,
}

impl<S: BoardMutationStore> ActionExecutor<S> {
    /// Create an executor writing to `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute one action against `card_id`.
    ///
    /// Creating an association that already exists (`ADD_LABEL`,
    /// `ASSIGN_MEMBER`) counts as success: the card is already in the
    /// requested state.
    ///
    /// # Errors
    ///
    /// Returns [`ActionFailure`] when the action is misconfigured, its type
    /// is unknown, or the store fails with anything but a uniqueness conflict.
    pub async fn execute(&self, action: &Action, card_id: &CardId) -> Result<String, ActionFailure> {
        let action_type = &action.action_type;
        match action_type {
            ActionType::ArchiveCard => {
                self.update(action_type, card_id, &CardPatch::archived())
                    .await?;
                Ok(format!("Card {card_id} archived."))
            }
            ActionType::MarkAsDone => {
                self.update(action_type, card_id, &CardPatch::done()).await?;
                Ok(format!("Card {card_id} marked as done."))
            }
            ActionType::AddLabel => {
                let label_id = LabelId::from(required(action, "label ID")?);
                let result = self.store.create_card_label(card_id, &label_id).await;
                converge(action_type, result)?;
                Ok(format!("Label {label_id} added to card."))
            }
            ActionType::RemoveLabel => {
                let label_id = LabelId::from(required(action, "label ID")?);
                self.store
                    .delete_card_label(card_id, &label_id)
                    .await
                    .map_err(|source| store_failure(action_type, source))?;
                Ok(format!("Label {label_id} removed from card."))
            }
            ActionType::MoveCard => {
                let list_id = ListId::from(required(action, "list ID")?);
                let patch = CardPatch::move_to(list_id.clone());
                self.update(action_type, card_id, &patch).await?;
                Ok(format!("Card {card_id} moved to list {list_id}."))
            }
            ActionType::AssignMember => {
                let user_id = UserId::from(required(action, "user ID")?);
                let result = self.store.create_card_member(card_id, &user_id).await;
                converge(action_type, result)?;
                Ok(format!("Member {user_id} assigned to card."))
            }
            ActionType::SetDueDate => {
                let raw = required(action, "due date")?;
                let spec = DueDateSpec::parse(raw)
                    .ok_or_else(|| ActionFailure::InvalidDueDate(raw.to_string()))?;
                let due_date = spec.resolve(now());
                self.update(action_type, card_id, &CardPatch::due(due_date))
                    .await?;
                Ok(format!(
                    "Due date for card {card_id} set to {}.",
                    due_date.to_rfc3339()
                ))
            }
            ActionType::Unrecognized(name) => Err(ActionFailure::UnknownType(name.clone())),
        }
    }

    async fn update(
        &self,
        action_type: &ActionType,
        card_id: &CardId,
        patch: &CardPatch,
    ) -> Result<(), ActionFailure> {
        self.store
            .update_card(card_id, patch)
            .await
            .map_err(|source| store_failure(action_type, source))
    }
}

fn required<'a>(action: &'a Action, what: &'static str) -> Result<&'a str, ActionFailure> {
    action.value().ok_or_else(|| ActionFailure::MissingValue {
        action_type: action.action_type.clone(),
        what,
    })
}

fn store_failure(action_type: &ActionType, source: BoardError) -> ActionFailure {
    ActionFailure::Store {
        action_type: action_type.clone(),
        source,
    }
}

/// Treat a uniqueness conflict on an association insert as already done.
fn converge(action_type: &ActionType, result: Result<(), BoardError>) -> Result<(), ActionFailure> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_conflict() => {
            tracing::debug!(%action_type, error = %err, "association already exists");
            Ok(())
        }
        Err(source) => Err(store_failure(action_type, source)),
    }
}
