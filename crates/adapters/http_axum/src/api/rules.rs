//! JSON REST handlers for automation rules and their audit trail.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use cardflow_app::ports::{AuditLogSink, CardRepository, RuleRepository, TriggerDispatcher};
use cardflow_domain::automation::{Action, AutomationLog, AutomationRule, TriggerType};
use cardflow_domain::id::{BoardId, RuleId};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LOG_LIMIT: usize = 50;

/// Request body for creating a rule.
#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub name: Option<String>,
    pub trigger_type: String,
    pub trigger_val: String,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Request body for enabling or disabling a rule.
#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Query parameters of the logs endpoint.
#[derive(Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AutomationRule>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and set-active endpoints.
pub enum GetResponse {
    Ok(Json<AutomationRule>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<AutomationRule>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the logs endpoint.
pub enum LogsResponse {
    Ok(Json<Vec<AutomationLog>>),
}

impl IntoResponse for LogsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/boards/{board_id}/rules`: list the rules of a board.
pub async fn list<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(board_id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let board_id: BoardId = board_id.parse()?;
    let rules = state.rule_service.list_rules(&board_id).await?;
    Ok(ListResponse::Ok(Json(rules)))
}

/// `POST /api/boards/{board_id}/rules`: create a rule.
pub async fn create<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(board_id): Path<String>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<CreateResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let board_id: BoardId = board_id.parse()?;
    let trigger_type = TriggerType::from_str(&req.trigger_type)?;

    let mut builder = AutomationRule::builder()
        .board_id(board_id)
        .trigger(trigger_type, req.trigger_val)
        .actions(req.actions);
    if let Some(name) = req.name {
        builder = builder.name(name);
    }
    if let Some(is_active) = req.is_active {
        builder = builder.active(is_active);
    }

    let created = state.rule_service.create_rule(builder.build()?).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /api/rules/{rule_id}`: get a rule by id.
pub async fn get<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(rule_id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let rule_id: RuleId = rule_id.parse()?;
    let rule = state.rule_service.get_rule(&rule_id).await?;
    Ok(GetResponse::Ok(Json(rule)))
}

/// `POST /api/rules/{rule_id}/active`: enable or disable a rule.
pub async fn set_active<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(rule_id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> Result<GetResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let rule_id: RuleId = rule_id.parse()?;
    let rule = state
        .rule_service
        .set_active(&rule_id, req.is_active)
        .await?;
    Ok(GetResponse::Ok(Json(rule)))
}

/// `DELETE /api/rules/{rule_id}`: delete a rule and its audit trail.
pub async fn delete<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(rule_id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let rule_id: RuleId = rule_id.parse()?;
    state.rule_service.delete_rule(&rule_id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/rules/{rule_id}/logs?limit=N`: audit entries, newest first.
pub async fn logs<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(rule_id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<LogsResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let rule_id: RuleId = rule_id.parse()?;
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT);
    let logs = state.rule_service.recent_logs(&rule_id, limit).await?;
    Ok(LogsResponse::Ok(Json(logs)))
}
