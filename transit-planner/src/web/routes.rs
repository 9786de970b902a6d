//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tracing::warn;

use crate::planner::PlanError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/journey/plan", post(plan_journey))
        .route("/journey/cache", delete(clear_cache))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan journeys between two coordinates.
async fn plan_journey(
    State(state): State<AppState>,
    body: Result<Json<PlanJourneyRequest>, JsonRejection>,
) -> Result<Json<PlanJourneyResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    let journeys = state
        .planner
        .plan_journey(req.origin, req.destination)
        .await?;

    Ok(Json(PlanJourneyResponse {
        journeys: journeys.iter().map(JourneyResult::from_journey).collect(),
    }))
}

/// Drop all cached planner results.
async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.planner.clear_journey_cache();
    StatusCode::NO_CONTENT
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidInput(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };
        warn!(status = %status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
