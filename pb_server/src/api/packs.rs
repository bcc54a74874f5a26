//! Pack tracking API handlers.
//!
//! # Examples
//!
//! Track a pack generated for the owner of a chat message:
//! ```bash
//! curl -X POST http://localhost:6970/api/v1/packs \
//!   -H "Content-Type: application/json" \
//!   -d '{"owner_message": "<@1234> opened a pack", "pack_text": "1 Opt\n2 Shock"}'
//! ```

use super::{
    AppState,
    errors::{ApiError, invalid_request, track_error},
    request_id::RequestId,
};
use crate::{logging, metrics};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pool_bot::{
    store::RemotePoolId,
    tracker::{PackEvent, PackSource, TrackOutcome, mentioned_owner},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct TrackPackRequest {
    /// Message the pack replies to; must mention the owner
    pub owner_message: String,
    pub pack_text: Option<String>,
    /// Pool link or id of a pack already hosted on the pool service
    pub pool_id: Option<String>,
}

impl TrackPackRequest {
    fn source(&self) -> Result<PackSource, ApiError> {
        match (&self.pack_text, &self.pool_id) {
            (Some(text), None) => Ok(PackSource::Inline(text.clone())),
            (None, Some(reference)) => RemotePoolId::from_reference(reference)
                .map(PackSource::Remote)
                .map_err(|e| invalid_request(e.client_message())),
            _ => Err(invalid_request(
                "Provide exactly one of pack_text or pool_id",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtendPoolRequest {
    pub pack_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtendPoolResponse {
    pub pool_id: RemotePoolId,
    pub pool_link: String,
}

/// Track a generated pack for the player mentioned in `owner_message`.
///
/// # Response
///
/// - `201 Created` with the published pack and pool links
/// - `202 Accepted` when the pack is the first half of a double pack
///
/// # Errors
///
/// - `404 Not Found`: Owner has no pool row, or the remote pack is unknown
/// - `409 Conflict`: Owner is busy or has no starting pool
/// - `422 Unprocessable Entity`: Malformed pack or request
/// - `502 Bad Gateway`: Pool service or ledger failure
pub async fn track_pack(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    Json(request): Json<TrackPackRequest>,
) -> Result<Response, ApiError> {
    let owner_id = mentioned_owner(&request.owner_message);
    let source = request.source()?;
    let event = PackEvent {
        owner_message: request.owner_message,
        source,
    };

    let result = state.tracker.track_pack(&event).await;
    metrics::double_packs_pending(state.tracker.pending_double_packs().await);

    match result {
        Ok(TrackOutcome::Tracked(pack)) => {
            metrics::packs_tracked_total("tracked");
            logging::log_pack_event(owner_id.as_deref(), "tracked", pack.pool_id.as_str());
            Ok((StatusCode::CREATED, Json(pack)).into_response())
        }
        Ok(TrackOutcome::Pending { owner_id }) => {
            metrics::packs_tracked_total("pending");
            logging::log_pack_event(Some(&owner_id), "pending", "waiting for second half");
            Ok((
                StatusCode::ACCEPTED,
                Json(json!({ "status": "pending", "owner_id": owner_id })),
            )
                .into_response())
        }
        Err(e) => {
            metrics::packs_tracked_total(e.label());
            logging::log_pack_event(
                owner_id.as_deref(),
                e.label(),
                &format!("{e} (request {request_id})"),
            );
            Err(track_error(&e))
        }
    }
}

/// Publish a pack as an extension of any hosted pool.
///
/// No ledger state is touched.
///
/// # Response
///
/// Returns `201 Created`:
/// ```json
/// { "pool_id": "xyz", "pool_link": "https://sealeddeck.tech/xyz" }
/// ```
pub async fn extend_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<String>,
    Json(request): Json<ExtendPoolRequest>,
) -> Result<(StatusCode, Json<ExtendPoolResponse>), ApiError> {
    let pool_id = state
        .tracker
        .add_pack_to_pool(&request.pack_text, &pool_id)
        .await
        .map_err(|e| track_error(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(ExtendPoolResponse {
            pool_link: state.tracker.pool_link(&pool_id),
            pool_id,
        }),
    ))
}
