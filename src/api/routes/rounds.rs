use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{organizer_from, ApiError};
use crate::engine::NewResult;
use crate::models::{Decision, PairingId, Round, TeamId};

#[derive(Debug, Deserialize)]
pub struct DrawRoundRequest {
    /// Tournament revision the draw is based on; a stale value is rejected
    pub expected_revision: Option<u64>,

    /// Fixed seed for a reproducible round-1 shuffle
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    pub pairing_id: PairingId,
    pub winner: TeamId,
    pub decision: Decision,
    pub affirmative_points: u32,
    pub negative_points: u32,
    pub expected_revision: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct RoundListResponse {
    pub rounds: Vec<Round>,
}

pub async fn draw_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<DrawRoundRequest>,
) -> Result<(StatusCode, Json<Round>), ApiError> {
    let organizer = organizer_from(&headers)?;
    let round = state
        .engine
        .draw_round(&id, &organizer, request.expected_revision, request.seed)
        .await?;
    Ok((StatusCode::CREATED, Json(round)))
}

pub async fn list_rounds(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoundListResponse>, ApiError> {
    let rounds = state.engine.rounds(&id)?;
    Ok(Json(RoundListResponse { rounds }))
}

pub async fn record_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<RecordResultRequest>,
) -> Result<Json<Round>, ApiError> {
    let organizer = organizer_from(&headers)?;
    let cmd = NewResult {
        pairing_id: request.pairing_id,
        winner: request.winner,
        decision: request.decision,
        affirmative_points: request.affirmative_points,
        negative_points: request.negative_points,
    };
    let round = state
        .engine
        .record_result(&id, cmd, &organizer, request.expected_revision)
        .await?;
    Ok(Json(round))
}
