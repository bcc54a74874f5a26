//! Per-player pool maintenance handlers.
//!
//! Every mutating endpoint republishes the player's pool from the change log
//! and answers with the new canonical link.

use super::{
    AppState,
    errors::{ApiError, track_error},
};
use crate::metrics;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use pool_bot::{
    pool::{CardList, total_cards},
    tracker::{CardEdit, PoolUpdate, TrackResult},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct StartingPoolRequest {
    /// Pool link or bare id
    pub reference: String,
}

#[derive(Debug, Deserialize)]
pub struct CardEditRequest {
    pub operation: CardEdit,
    pub card: String,
}

#[derive(Debug, Serialize)]
pub struct PoolPreview {
    pub owner_id: String,
    pub cards: CardList,
    pub card_count: i64,
}

/// Count a republish and map its error
fn rebuilt(trigger: &str, result: TrackResult<PoolUpdate>) -> Result<Json<PoolUpdate>, ApiError> {
    match result {
        Ok(update) => {
            metrics::pool_rebuilds_total(trigger);
            Ok(Json(update))
        }
        Err(e) => {
            tracing::warn!(trigger = trigger, "Pool rebuild failed: {}", e);
            Err(track_error(&e))
        }
    }
}

/// Treat the owner's next two packs as one double pack.
///
/// Returns `202 Accepted`; the pool is updated once the second half arrives.
pub async fn expect_double_pack(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.tracker.expect_double_pack(&owner_id).await;
    metrics::double_packs_pending(state.tracker.pending_double_packs().await);

    (
        StatusCode::ACCEPTED,
        Json(json!({ "status": "expecting", "owner_id": owner_id })),
    )
}

/// Record the owner's sealed starting pool.
///
/// # Errors
///
/// - `404 Not Found`: Owner has no pool row
/// - `422 Unprocessable Entity`: Reference is not a pool link or id
pub async fn set_starting_pool(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Json(request): Json<StartingPoolRequest>,
) -> Result<Json<PoolUpdate>, ApiError> {
    state
        .tracker
        .track_starting_pool(&owner_id, &request.reference)
        .await
        .map(Json)
        .map_err(|e| track_error(&e))
}

/// Add or remove a single card.
///
/// ```bash
/// curl -X POST http://localhost:6970/api/v1/players/1234/cards \
///   -H "Content-Type: application/json" \
///   -d '{"operation": "remove", "card": "Shock"}'
/// ```
pub async fn edit_card(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Json(request): Json<CardEditRequest>,
) -> Result<Json<PoolUpdate>, ApiError> {
    let result = state
        .tracker
        .record_card_change(&owner_id, request.operation, &request.card)
        .await;
    rebuilt("card_edit", result)
}

/// Drop a tracked pack; `pack_id` may be a bare id or an encoded link.
pub async fn remove_pack(
    State(state): State<AppState>,
    Path((owner_id, pack_id)): Path<(String, String)>,
) -> Result<Json<PoolUpdate>, ApiError> {
    let result = state.tracker.remove_pack(&owner_id, &pack_id).await;
    rebuilt("remove_pack", result)
}

/// Republish the owner's pool from the change log.
pub async fn rebuild_pool(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<PoolUpdate>, ApiError> {
    let result = state.tracker.rebuild_pool(&owner_id).await;
    rebuilt("manual", result)
}

/// Replay the change log without publishing.
///
/// The preview excludes the starting pool.
pub async fn preview_pool(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<PoolPreview>, ApiError> {
    let cards = state
        .tracker
        .current_pool(&owner_id)
        .await
        .map_err(|e| track_error(&e))?;

    Ok(Json(PoolPreview {
        card_count: total_cards(&cards),
        owner_id,
        cards,
    }))
}
