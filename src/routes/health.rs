// src/routes/health.rs
//! Liveness endpoint for the `cityweather` proxy.
//!
//! `/health` answers as long as the process can serve HTTP. It does not call
//! upstream and does not check whether the credential is configured, so a
//! deployment missing `WEATHER_API_KEY` is still reported alive.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health`.
///
/// Returns a static `{"status":"ok"}` body.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Create a subrouter containing the `/health` route.
///
/// Generic over the state type so it merges with any gateway router.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
