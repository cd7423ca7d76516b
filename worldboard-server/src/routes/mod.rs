pub mod calendar;
pub mod countries;
pub mod dashboard;
pub mod map;
pub mod projects;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use worldboard_core::WorldboardError;

use crate::state::AppState;

/// All endpoints, ready for `with_state`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(calendar::router())
        .merge(map::router())
        .merge(countries::router())
        .merge(projects::router())
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert errors to HTTP responses
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<WorldboardError>() {
            Some(WorldboardError::Validation(_) | WorldboardError::InvalidCell(_)) => StatusCode::BAD_REQUEST,
            Some(WorldboardError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
