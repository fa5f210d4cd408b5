// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. Read endpoints recompute their view
// from the current store contents on every request; write endpoints feed the
// store the way the external listing / transaction / market-data services
// would.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::market_clock::MarketStatus;
use crate::store::StoreError;
use crate::types::{Listing, PricePoint, Transaction};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Read ────────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/analytics", get(analytics))
        .route("/api/v1/summary", get(summary))
        .route("/api/v1/indicators", get(indicators))
        .route("/api/v1/indicators/latest", get(latest_indicators))
        .route("/api/v1/order-book", get(order_book))
        .route("/api/v1/market-status", get(market_status))
        // ── Feed ────────────────────────────────────────────────────
        .route("/api/v1/price-points", post(append_price_points))
        .route("/api/v1/listings", put(replace_listings))
        .route("/api/v1/transactions", post(append_transactions))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

#[derive(Deserialize)]
struct RegionQuery {
    #[serde(default)]
    region: Option<String>,
}

impl RegionQuery {
    fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(err: StoreError) -> ApiError {
    warn!(error = %err, "rejected feed update");
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Analytics views
// =============================================================================

async fn analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> impl IntoResponse {
    Json(state.analytics(query.region()))
}

async fn summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> impl IntoResponse {
    Json(state.summary(query.region(), &chrono::Local::now()))
}

async fn indicators(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> impl IntoResponse {
    Json(state.indicators(query.region()))
}

async fn latest_indicators(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> impl IntoResponse {
    Json(state.indicators(query.region()).latest())
}

async fn order_book(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.market_depth())
}

async fn market_status() -> impl IntoResponse {
    Json(MarketStatus::at(&chrono::Local::now()))
}

// =============================================================================
// Feed endpoints
// =============================================================================

#[derive(Serialize)]
struct FeedResponse {
    stored: usize,
    state_version: u64,
}

async fn append_price_points(
    State(state): State<Arc<AppState>>,
    Json(points): Json<Vec<PricePoint>>,
) -> Result<impl IntoResponse, ApiError> {
    let added = points.len();
    let stored = state.store.append_price_points(points).map_err(bad_request)?;
    state.increment_version();
    info!(added, stored, "price points appended");

    Ok(Json(FeedResponse {
        stored,
        state_version: state.current_state_version(),
    }))
}

async fn replace_listings(
    State(state): State<Arc<AppState>>,
    Json(listings): Json<Vec<Listing>>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state.store.replace_listings(listings).map_err(bad_request)?;
    state.increment_version();
    info!(stored, "listing snapshot replaced");

    Ok(Json(FeedResponse {
        stored,
        state_version: state.current_state_version(),
    }))
}

async fn append_transactions(
    State(state): State<Arc<AppState>>,
    Json(transactions): Json<Vec<Transaction>>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state
        .store
        .append_transactions(transactions)
        .map_err(bad_request)?;
    state.increment_version();
    info!(stored, "transactions appended");

    Ok(Json(FeedResponse {
        stored,
        state_version: state.current_state_version(),
    }))
}

// =============================================================================
// Tests
// =============================================================================
