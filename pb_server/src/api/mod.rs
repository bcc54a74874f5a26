//! HTTP API for the pool bot.
//!
//! The chat front end forwards league commands here; every handler is a thin
//! wrapper over [`PackTracker`].
//!
//! # Modules
//!
//! - [`packs`]: Tracking generated packs and extending arbitrary pools
//! - [`players`]: Starting pools, card edits, pack removal and pool previews
//! - [`request_id`]: Request correlation and per-route accounting
//! - [`errors`]: Tracker error to HTTP status mapping
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health                                   - Health check
//! POST   /api/v1/packs                             - Track a generated pack
//! POST   /api/v1/pools/{pool_id}/packs             - Extend any pool with a pack
//! POST   /api/v1/players/{owner_id}/double-pack    - Expect a double pack
//! POST   /api/v1/players/{owner_id}/starting-pool  - Record the starting pool
//! POST   /api/v1/players/{owner_id}/cards          - Add or remove one card
//! DELETE /api/v1/players/{owner_id}/packs/{pack}   - Drop a tracked pack
//! POST   /api/v1/players/{owner_id}/rebuild        - Republish from the log
//! GET    /api/v1/players/{owner_id}/pool           - Preview the replayed pool
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pb_server::api::{AppState, create_router};
//! use pool_bot::{InMemoryLedger, InMemoryPoolStore, PackTracker, TrackerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = Arc::new(InMemoryLedger::new(vec![]));
//! let tracker = PackTracker::new(
//!     Arc::new(InMemoryPoolStore::new()),
//!     ledger.clone(),
//!     TrackerConfig::default(),
//! );
//!
//! let app = create_router(AppState {
//!     tracker: Arc::new(tracker),
//!     ledger,
//! });
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:6970").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. Put the server behind a proxy with
//! stricter origins when exposing it beyond the bot host.

pub mod errors;
pub mod packs;
pub mod players;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
};
use pool_bot::{Ledger, PackTracker};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// The ledger is the same instance the tracker writes through; it is kept
/// here for health checks.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<PackTracker>,
    pub ledger: Arc<dyn Ledger>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Arguments
///
/// - `state`: Application state with the tracker
///
/// # Returns
///
/// Configured Axum router ready to serve requests
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
fn create_v1_router() -> Router<AppState> {
    let pack_routes = Router::new()
        .route("/packs", post(packs::track_pack))
        .route("/pools/{pool_id}/packs", post(packs::extend_pool));

    let player_routes = Router::new()
        .route(
            "/players/{owner_id}/double-pack",
            post(players::expect_double_pack),
        )
        .route(
            "/players/{owner_id}/starting-pool",
            post(players::set_starting_pool),
        )
        .route("/players/{owner_id}/cards", post(players::edit_card))
        .route(
            "/players/{owner_id}/packs/{pack_id}",
            delete(players::remove_pack),
        )
        .route("/players/{owner_id}/rebuild", post(players::rebuild_pool))
        .route("/players/{owner_id}/pool", get(players::preview_pool));

    Router::new().merge(pack_routes).merge(player_routes)
}

/// Health check endpoint for monitoring.
///
/// Returns `200 OK` when the ledger answers, `503 Service Unavailable`
/// otherwise.
///
/// # Example
///
/// ```bash
/// curl http://localhost:6970/health
/// # {"status":"healthy","ledger":true,"double_packs_pending":0,...}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let ledger_healthy = match state.ledger.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Ledger health check failed: {}", e);
            false
        }
    };
    let pending = state.tracker.pending_double_packs().await;

    let status_code = if ledger_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if ledger_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "ledger": ledger_healthy,
        "double_packs_pending": pending,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
