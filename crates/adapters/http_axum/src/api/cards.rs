//! JSON REST handlers for cards.
//!
//! Creating a card fires `CARD_CREATED`; moving it to another list fires
//! `CARD_MOVED_TO_LIST`. Both return the card as left by automation.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use cardflow_app::ports::{AuditLogSink, CardRepository, RuleRepository, TriggerDispatcher};
use cardflow_domain::card::Card;
use cardflow_domain::id::{BoardId, CardId, LabelId, ListId, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a card.
#[derive(Deserialize)]
pub struct CreateCardRequest {
    pub list_id: String,
    pub title: String,
    pub position: Option<i64>,
}

/// Request body for moving a card.
#[derive(Deserialize)]
pub struct MoveCardRequest {
    pub list_id: String,
    pub position: Option<i64>,
}

/// A card with its label and member associations.
#[derive(Serialize)]
pub struct CardView {
    #[serde(flatten)]
    pub card: Card,
    pub labels: Vec<LabelId>,
    pub members: Vec<UserId>,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Card>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<CardView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the move endpoint.
pub enum MoveResponse {
    Ok(Json<Card>),
}

impl IntoResponse for MoveResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/boards/{board_id}/cards`: create a card in a list.
pub async fn create<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(board_id): Path<String>,
    Json(req): Json<CreateCardRequest>,
) -> Result<CreateResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let board_id: BoardId = board_id.parse()?;
    let card = state
        .card_service
        .create_card(board_id, ListId::from(req.list_id), req.title, req.position)
        .await?;
    Ok(CreateResponse::Created(Json(card)))
}

/// `GET /api/cards/{card_id}`: get a card with its labels and members.
pub async fn get<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(card_id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let card_id: CardId = card_id.parse()?;
    let details = state.card_service.get_card_details(&card_id).await?;
    Ok(GetResponse::Ok(Json(CardView {
        card: details.card,
        labels: details.labels,
        members: details.members,
    })))
}

/// `POST /api/cards/{card_id}/move`: move a card to a list.
pub async fn move_card<CR, D, RR, L>(
    State(state): State<AppState<CR, D, RR, L>>,
    Path(card_id): Path<String>,
    Json(req): Json<MoveCardRequest>,
) -> Result<MoveResponse, ApiError>
where
    CR: CardRepository + Send + Sync + 'static,
    D: TriggerDispatcher + Send + Sync + 'static,
    RR: RuleRepository + Send + Sync + 'static,
    L: AuditLogSink + Send + Sync + 'static,
{
    let card_id: CardId = card_id.parse()?;
    let list_id: ListId = req.list_id.parse()?;
    let card = state
        .card_service
        .move_card(&card_id, list_id, req.position)
        .await?;
    Ok(MoveResponse::Ok(Json(card)))
}
