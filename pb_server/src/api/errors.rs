//! Mapping of tracker errors onto HTTP responses.

use axum::{Json, http::StatusCode};
use pool_bot::{store::StoreError, tracker::TrackError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Status code for a tracker error
pub fn status_for(err: &TrackError) -> StatusCode {
    match err {
        TrackError::OwnerNotFound(_) | TrackError::PackUnresolved(StoreError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        TrackError::Format(_)
        | TrackError::EmptyPack
        | TrackError::EmptyCardName
        | TrackError::InvalidReference(_)
        | TrackError::MissingOwnerMention => StatusCode::UNPROCESSABLE_ENTITY,
        TrackError::Busy { .. } | TrackError::MissingStartingPool(_) => StatusCode::CONFLICT,
        TrackError::PackUnresolved(_) | TrackError::PoolService(_) | TrackError::Ledger(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

/// Convert a tracker error into a caller-safe response
pub fn track_error(err: &TrackError) -> ApiError {
    (
        status_for(err),
        Json(ErrorResponse {
            error: err.client_message(),
            kind: err.label(),
        }),
    )
}

/// Reject a request body before it reaches the tracker
pub fn invalid_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: message.into(),
            kind: "invalid_request",
        }),
    )
}
