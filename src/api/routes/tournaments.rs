use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{organizer_from, ApiError};
use crate::engine::NewTournament;
use crate::models::Tournament;

#[derive(Debug, Serialize)]
pub struct TournamentListResponse {
    pub tournaments: Vec<Tournament>,
}

pub async fn create_tournament(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(cmd): Json<NewTournament>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let organizer = organizer_from(&headers)?;
    let tournament = state.engine.create_tournament(cmd, &organizer).await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<TournamentListResponse>, ApiError> {
    let tournaments = state.engine.list_tournaments()?;
    Ok(Json(TournamentListResponse { tournaments }))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tournament>, ApiError> {
    let tournament = state.engine.get_tournament(&id)?;
    Ok(Json(tournament))
}
