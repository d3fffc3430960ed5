use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Standing;

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<Standing>,
}

pub async fn get_standings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let standings = state.engine.standings(&id)?;
    Ok(Json(StandingsResponse { standings }))
}
