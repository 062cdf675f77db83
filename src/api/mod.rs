use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{ErrorKind, TripPlan, TripPlanner, TripPlannerError, TripRequest, VERSION};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

impl ErrorKind {
    #[must_use]
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TripPlannerError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match kind {
            ErrorKind::UpstreamUnavailable | ErrorKind::Config => error!("Request failed: {}", self),
            ErrorKind::InvalidRequest | ErrorKind::NotFound => warn!("Request rejected: {}", self),
        }
        let body = ApiError {
            error: kind.as_str().to_string(),
            message: self.user_message(),
        };
        (kind.status_code(), Json(body)).into_response()
    }
}

pub fn router(planner: Arc<TripPlanner>) -> Router {
    Router::new()
        .route("/plan-trip", post(plan_trip))
        .route("/health", get(health))
        .with_state(planner)
}

async fn plan_trip(
    State(planner): State<Arc<TripPlanner>>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<TripPlan>, TripPlannerError> {
    let Json(request) = payload.map_err(|rejection| TripPlannerError::invalid_request(rejection.body_text()))?;
    let plan = planner.plan(&request).await?;
    Ok(Json(plan))
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}
