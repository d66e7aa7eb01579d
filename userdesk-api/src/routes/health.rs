/// Health check endpoint
///
/// Reports whether the server is running and whether the user store answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "store": "connected"
/// }
/// ```
///
/// The status code is 200 even when the store is down; `status` then reads
/// `"degraded"` and `store` reads `"disconnected"`.

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// User store status
    pub store: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_up = state.users.health().await;

    Json(HealthResponse {
        status: if store_up { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: if store_up { "connected" } else { "disconnected" }.to_string(),
    })
}
