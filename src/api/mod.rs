//! REST API endpoints.
//!
//! Axum-based HTTP API for managing tournaments: registration, draws,
//! result entry and standings. Mutating endpoints identify the caller
//! through the `X-Organizer` header; only the owning organizer may
//! modify a tournament.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::engine::EngineError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(e) => ApiError::BadRequest(e.to_string()),
            EngineError::Draw(e) => ApiError::Unprocessable(e.to_string()),
            EngineError::NotFound(id) => ApiError::NotFound(id),
            EngineError::Forbidden { .. } => ApiError::Forbidden(err.to_string()),
            EngineError::AlreadyExists | EngineError::ConcurrentModification { .. } => {
                ApiError::Conflict(err.to_string())
            }
            EngineError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Unprocessable(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DRAW_FAILED")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// The calling organizer, taken from the `X-Organizer` header.
pub fn organizer_from(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("x-organizer")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().to_string())
        .ok_or_else(|| ApiError::BadRequest("missing X-Organizer header".to_string()))
}

/// Build the application router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = if cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers(Any)
    } else {
        let origin = cors_origin
            .parse::<HeaderValue>()
            .unwrap_or_else(|_| HeaderValue::from_static("*"));
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers(Any)
    };

    Router::new()
        .route(
            "/api/tournaments",
            post(routes::tournaments::create_tournament).get(routes::tournaments::list_tournaments),
        )
        .route("/api/tournaments/:id", get(routes::tournaments::get_tournament))
        .route(
            "/api/tournaments/:id/teams",
            post(routes::teams::register_team).get(routes::teams::list_teams),
        )
        .route(
            "/api/tournaments/:id/teams/:team_id",
            put(routes::teams::correct_team),
        )
        .route(
            "/api/tournaments/:id/adjudicators",
            post(routes::teams::add_adjudicator).get(routes::teams::list_adjudicators),
        )
        .route(
            "/api/tournaments/:id/rounds",
            post(routes::rounds::draw_round).get(routes::rounds::list_rounds),
        )
        .route("/api/tournaments/:id/results", post(routes::rounds::record_result))
        .route(
            "/api/tournaments/:id/standings",
            get(routes::standings::get_standings),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
