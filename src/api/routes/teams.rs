use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{organizer_from, ApiError};
use crate::engine::{NewAdjudicator, NewTeam};
use crate::models::{Adjudicator, Team, TeamId};

#[derive(Debug, Serialize)]
pub struct TeamListResponse {
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize)]
pub struct AdjudicatorListResponse {
    pub adjudicators: Vec<Adjudicator>,
}

pub async fn register_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(cmd): Json<NewTeam>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let organizer = organizer_from(&headers)?;
    let team = state.engine.register_team(&id, cmd, &organizer).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn list_teams(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamListResponse>, ApiError> {
    let teams = state.engine.teams(&id)?;
    Ok(Json(TeamListResponse { teams }))
}

pub async fn correct_team(
    State(state): State<AppState>,
    Path((id, team_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(cmd): Json<NewTeam>,
) -> Result<Json<Team>, ApiError> {
    let organizer = organizer_from(&headers)?;
    let team_id = TeamId::from(team_id);
    let team = state
        .engine
        .correct_team(&id, &team_id, cmd, &organizer)
        .await?;
    Ok(Json(team))
}

pub async fn add_adjudicator(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(cmd): Json<NewAdjudicator>,
) -> Result<(StatusCode, Json<Adjudicator>), ApiError> {
    let organizer = organizer_from(&headers)?;
    let adjudicator = state.engine.add_adjudicator(&id, cmd, &organizer).await?;
    Ok((StatusCode::CREATED, Json(adjudicator)))
}

pub async fn list_adjudicators(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdjudicatorListResponse>, ApiError> {
    let adjudicators = state.engine.adjudicators(&id)?;
    Ok(Json(AdjudicatorListResponse { adjudicators }))
}
