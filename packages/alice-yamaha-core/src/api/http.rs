//! HTTP route handlers.
//!
//! All handlers are thin - they delegate to services for business logic.
//! Platform endpoints require an [`AuthenticatedUser`]; the extractor runs
//! before the body is parsed, so unauthenticated requests never reach a
//! receiver.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, head, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::api::AppState;
use crate::auth::AuthenticatedUser;
use crate::error::{BridgeError, BridgeResult};
use crate::protocol_constants::SERVICE_ID;
use crate::services::{ActionRequest, QueryRequest, UnlinkResponse};

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let prefix = state.config.url_prefix.clone();

    Router::new()
        .route("/health", get(health_check))
        .route(&prefix, head(availability_check))
        .route(&format!("{}/user/devices", prefix), get(list_devices))
        .route(&format!("{}/user/devices/query", prefix), post(query_devices))
        .route(&format!("{}/user/devices/action", prefix), post(perform_actions))
        .route(&format!("{}/user/unlink", prefix), post(unlink))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Liveness probe.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": SERVICE_ID,
    }))
}

/// Endpoint availability probe used by the platform before linking.
async fn availability_check() -> StatusCode {
    StatusCode::OK
}

async fn list_devices(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> BridgeResult<impl IntoResponse> {
    Ok(Json(state.devices.list_devices(&user).await?))
}

async fn query_devices(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> BridgeResult<impl IntoResponse> {
    let Json(request) = body.map_err(invalid_body)?;
    Ok(Json(state.devices.query_devices(&user, &request).await?))
}

async fn perform_actions(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> BridgeResult<impl IntoResponse> {
    let Json(request) = body.map_err(invalid_body)?;
    Ok(Json(state.devices.perform_actions(&user, &request).await?))
}

/// Account unlink. Nothing is stored per user, so there is nothing to remove.
async fn unlink(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    log::info!("[Auth] User {} unlinked", user.id);
    Json(UnlinkResponse::new())
}

fn invalid_body(rejection: JsonRejection) -> BridgeError {
    BridgeError::InvalidRequest(rejection.body_text())
}
