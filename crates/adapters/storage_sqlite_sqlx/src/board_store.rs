//! `SQLite` implementation of [`BoardMutationStore`] and [`CardRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use cardflow_app::ports::{BoardMutationStore, CardRepository};
use cardflow_domain::card::{Card, CardPatch};
use cardflow_domain::error::{BoardError, NotFoundError};
use cardflow_domain::id::{CardId, LabelId, UserId};

use crate::error::{StorageError, conflict_or_storage};
use crate::time;

const INSERT_CARD: &str = "INSERT INTO cards (id, board_id, list_id, title, position, archived, is_done, due_date, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE_CARD: &str = "UPDATE cards SET list_id = ?, title = ?, position = ?, archived = ?, is_done = ?, due_date = ? WHERE id = ?";

// `NULL` binds leave the column untouched.
const PATCH_CARD: &str = "UPDATE cards SET archived = COALESCE(?, archived), is_done = COALESCE(?, is_done), list_id = COALESCE(?, list_id), position = COALESCE(?, position), due_date = COALESCE(?, due_date) WHERE id = ?";

struct Wrapper(Card);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let board_id: String = row.try_get("board_id")?;
        let list_id: String = row.try_get("list_id")?;
        let due_date: Option<String> = row.try_get("due_date")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Card {
            id: id.into(),
            board_id: board_id.into(),
            list_id: list_id.into(),
            title: row.try_get("title")?,
            position: row.try_get("position")?,
            archived: row.try_get("archived")?,
            is_done: row.try_get("is_done")?,
            due_date: due_date.as_deref().map(time::decode).transpose()?,
            created_at: time::decode(&created_at)?,
        }))
    }
}

fn card_not_found(id: &CardId) -> BoardError {
    NotFoundError {
        entity: "Card",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed store for cards and their label/member associations.
#[derive(Clone)]
pub struct SqliteBoardStore {
    pool: SqlitePool,
}

impl SqliteBoardStore {
    /// Create a new store backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl BoardMutationStore for SqliteBoardStore {
    async fn update_card(&self, card_id: &CardId, patch: &CardPatch) -> Result<(), BoardError> {
        let result = sqlx::query(PATCH_CARD)
            .bind(patch.archived)
            .bind(patch.is_done)
            .bind(patch.list_id.as_ref().map(|id| id.as_str()))
            .bind(patch.position)
            .bind(patch.due_date.map(time::encode))
            .bind(card_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(card_not_found(card_id));
        }
        Ok(())
    }

    async fn create_card_label(
        &self,
        card_id: &CardId,
        label_id: &LabelId,
    ) -> Result<(), BoardError> {
        sqlx::query("INSERT INTO card_labels (card_id, label_id) VALUES (?, ?)")
            .bind(card_id.as_str())
            .bind(label_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| conflict_or_storage(err, "CardLabel", format!("{card_id}/{label_id}")))?;
        Ok(())
    }

    async fn delete_card_label(
        &self,
        card_id: &CardId,
        label_id: &LabelId,
    ) -> Result<(), BoardError> {
        sqlx::query("DELETE FROM card_labels WHERE card_id = ? AND label_id = ?")
            .bind(card_id.as_str())
            .bind(label_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn create_card_member(
        &self,
        card_id: &CardId,
        user_id: &UserId,
    ) -> Result<(), BoardError> {
        sqlx::query("INSERT INTO card_members (card_id, user_id) VALUES (?, ?)")
            .bind(card_id.as_str())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| conflict_or_storage(err, "CardMember", format!("{card_id}/{user_id}")))?;
        Ok(())
    }
}

impl CardRepository for SqliteBoardStore {
    async fn create(&self, card: Card) -> Result<Card, BoardError> {
        sqlx::query(INSERT_CARD)
            .bind(card.id.as_str())
            .bind(card.board_id.as_str())
            .bind(card.list_id.as_str())
            .bind(&card.title)
            .bind(card.position)
            .bind(card.archived)
            .bind(card.is_done)
            .bind(card.due_date.map(time::encode))
            .bind(time::encode(card.created_at))
            .execute(&self.pool)
            .await
            .map_err(|err| conflict_or_storage(err, "Card", card.id.to_string()))?;
        Ok(card)
    }

    async fn get_by_id(&self, id: &CardId) -> Result<Option<Card>, BoardError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM cards WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn update(&self, card: Card) -> Result<Card, BoardError> {
        let result = sqlx::query(UPDATE_CARD)
            .bind(card.list_id.as_str())
            .bind(&card.title)
            .bind(card.position)
            .bind(card.archived)
            .bind(card.is_done)
            .bind(card.due_date.map(time::encode))
            .bind(card.id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(card_not_found(&card.id));
        }
        Ok(card)
    }

    async fn labels_of(&self, card_id: &CardId) -> Result<Vec<LabelId>, BoardError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT label_id FROM card_labels WHERE card_id = ? ORDER BY label_id",
        )
        .bind(card_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|(id,)| LabelId::from(id)).collect())
    }

    async fn members_of(&self, card_id: &CardId) -> Result<Vec<UserId>, BoardError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM card_members WHERE card_id = ? ORDER BY user_id",
        )
        .bind(card_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|(id,)| UserId::from(id)).collect())
    }
}
