//! `SQLite` implementation of [`RuleRepository`].
//!
//! Rules live in `automation_rules`; their actions are child rows in
//! `automation_actions` keyed by `(rule_id, position)`.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use cardflow_app::ports::RuleRepository;
use cardflow_domain::automation::{Action, ActionType, AutomationRule, TriggerType};
use cardflow_domain::error::BoardError;
use cardflow_domain::id::{BoardId, RuleId};

use crate::error::{StorageError, conflict_or_storage};
use crate::time;

const INSERT_RULE: &str = "INSERT INTO automation_rules (id, board_id, name, trigger_type, trigger_val, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)";

const INSERT_ACTION: &str =
    "INSERT INTO automation_actions (rule_id, position, type, value) VALUES (?, ?, ?, ?)";

const SELECT_ACTIONS: &str =
    "SELECT type, value FROM automation_actions WHERE rule_id = ? ORDER BY position";

/// A rule row without its actions.
struct Wrapper(AutomationRule);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let board_id: String = row.try_get("board_id")?;
        let trigger_type: String = row.try_get("trigger_type")?;
        let trigger_val: String = row.try_get("trigger_val")?;
        let created_at: String = row.try_get("created_at")?;

        let trigger_type = TriggerType::from_str(&trigger_type)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(AutomationRule {
            id: id.into(),
            board_id: board_id.into(),
            name: row.try_get("name")?,
            trigger_type,
            trigger_val: trigger_val.into(),
            is_active: row.try_get("is_active")?,
            actions: Vec::new(),
            created_at: time::decode(&created_at)?,
        }))
    }
}

/// `SQLite`-backed automation rule repository.
#[derive(Clone)]
pub struct SqliteRuleRepository {
    pool: SqlitePool,
}

impl SqliteRuleRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_actions(&self, rule_id: &RuleId) -> Result<Vec<Action>, BoardError> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(SELECT_ACTIONS)
            .bind(rule_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(action_type, value)| Action {
                action_type: ActionType::from(action_type),
                value,
            })
            .collect())
    }

    async fn with_actions(&self, rows: Vec<Wrapper>) -> Result<Vec<AutomationRule>, BoardError> {
        let mut rules = Vec::with_capacity(rows.len());
        for Wrapper(mut rule) in rows {
            rule.actions = self.load_actions(&rule.id).await?;
            rules.push(rule);
        }
        Ok(rules)
    }
}

impl RuleRepository for SqliteRuleRepository {
    async fn find_active_rules(
        &self,
        board_id: &BoardId,
        trigger_type: TriggerType,
    ) -> Result<Vec<AutomationRule>, BoardError> {
        let rows: Vec<Wrapper> = sqlx::query_as(
            "SELECT * FROM automation_rules WHERE board_id = ? AND trigger_type = ? AND is_active = 1 ORDER BY created_at, rowid",
        )
        .bind(board_id.as_str())
        .bind(trigger_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        self.with_actions(rows).await
    }

    async fn create(&self, rule: AutomationRule) -> Result<AutomationRule, BoardError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(INSERT_RULE)
            .bind(rule.id.as_str())
            .bind(rule.board_id.as_str())
            .bind(rule.name.as_deref())
            .bind(rule.trigger_type.as_str())
            .bind(rule.trigger_val.as_str())
            .bind(rule.is_active)
            .bind(time::encode(rule.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|err| conflict_or_storage(err, "AutomationRule", rule.id.to_string()))?;

        for (position, action) in (0_i64..).zip(&rule.actions) {
            sqlx::query(INSERT_ACTION)
                .bind(rule.id.as_str())
                .bind(position)
                .bind(action.action_type.as_str())
                .bind(action.value.as_deref())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(rule)
    }

    async fn get_by_id(&self, id: &RuleId) -> Result<Option<AutomationRule>, BoardError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM automation_rules WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        match row {
            Some(row) => Ok(self.with_actions(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_board(&self, board_id: &BoardId) -> Result<Vec<AutomationRule>, BoardError> {
        let rows: Vec<Wrapper> = sqlx::query_as(
            "SELECT * FROM automation_rules WHERE board_id = ? ORDER BY created_at, rowid",
        )
        .bind(board_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        self.with_actions(rows).await
    }

    async fn set_active(&self, id: &RuleId, is_active: bool) -> Result<bool, BoardError> {
        let result = sqlx::query("UPDATE automation_rules SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &RuleId) -> Result<(), BoardError> {
        sqlx::query("DELETE FROM automation_rules WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::TimeDelta;

    async fn setup() -> SqliteRuleRepository {
        let db = Config::in_memory().build().await.unwrap();
        SqliteRuleRepository::new(db.pool().clone())
    }

    fn rule(id: &str, trigger_type: TriggerType, list: &str) -> AutomationRule {
        AutomationRule::builder()
            .id(id)
            .board_id("board-1")
            .trigger(trigger_type, list)
            .action(Action::new(ActionType::MarkAsDone))
            .action(Action::with_value(ActionType::AddLabel, "label-shipped"))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_round_trip_rule_with_ordered_actions() {
        let repo = setup().await;
        let mut created = rule("rule-1", TriggerType::CardMovedToList, "list-done");
        created.name = Some("Ship it".to_string());
        created.created_at = cardflow_domain::time::parse_iso8601("2025-03-01T09:15:00Z").unwrap();
        created
            .actions
            .push(Action::new(ActionType::from("SEND_CARROTS")));
        repo.create(created.clone()).await.unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(
            fetched.actions[2].action_type,
            ActionType::Unrecognized("SEND_CARROTS".to_string())
        );
    }

    #[tokio::test]
    async fn should_return_none_for_missing_rule() {
        let repo = setup().await;
        assert!(repo.get_by_id(&RuleId::from("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_return_conflict_for_duplicate_id() {
        let repo = setup().await;
        let created = rule("rule-1", TriggerType::CardCreated, "list-1");
        repo.create(created.clone()).await.unwrap();
        let result = repo.create(created).await;
        assert!(matches!(result, Err(ref err) if err.is_conflict()));
    }

    #[tokio::test]
    async fn should_find_active_rules_in_creation_order() {
        let repo = setup().await;
        let base = cardflow_domain::time::now();

        let mut second = rule("rule-b", TriggerType::CardMovedToList, "list-done");
        second.created_at = base + TimeDelta::seconds(1);
        let mut first = rule("rule-a", TriggerType::CardMovedToList, "list-done");
        first.created_at = base;
        let mut inactive = rule("rule-c", TriggerType::CardMovedToList, "list-done");
        inactive.is_active = false;
        let other_type = rule("rule-d", TriggerType::CardCreated, "list-done");
        let mut other_board = rule("rule-e", TriggerType::CardMovedToList, "list-done");
        other_board.board_id = BoardId::from("board-2");

        for r in [second, first, inactive, other_type, other_board] {
            repo.create(r).await.unwrap();
        }

        let found = repo
            .find_active_rules(&BoardId::from("board-1"), TriggerType::CardMovedToList)
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rule-a", "rule-b"]);
        assert_eq!(found[0].actions.len(), 2);
    }

    #[tokio::test]
    async fn should_toggle_rule_and_report_missing() {
        let repo = setup().await;
        repo.create(rule("rule-1", TriggerType::CardCreated, "list-1"))
            .await
            .unwrap();

        assert!(repo.set_active(&RuleId::from("rule-1"), false).await.unwrap());
        assert!(!repo.set_active(&RuleId::from("nope"), false).await.unwrap());

        let fetched = repo.get_by_id(&RuleId::from("rule-1")).await.unwrap().unwrap();
        assert!(!fetched.is_active);
        let active = repo
            .find_active_rules(&BoardId::from("board-1"), TriggerType::CardCreated)
            .await
            .unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn should_delete_rule_with_actions() {
        let repo = setup().await;
        repo.create(rule("rule-1", TriggerType::CardCreated, "list-1"))
            .await
            .unwrap();
        repo.delete(&RuleId::from("rule-1")).await.unwrap();

        assert!(repo.get_by_id(&RuleId::from("rule-1")).await.unwrap().is_none());
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM automation_actions")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn should_list_rules_of_board_including_inactive() {
        let repo = setup().await;
        let mut inactive = rule("rule-1", TriggerType::CardCreated, "list-1");
        inactive.is_active = false;
        repo.create(inactive).await.unwrap();
        let mut other = rule("rule-2", TriggerType::CardCreated, "list-1");
        other.board_id = BoardId::from("board-2");
        repo.create(other).await.unwrap();

        let rules = repo.find_by_board(&BoardId::from("board-1")).await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id.as_str(), "rule-1");
    }
}
