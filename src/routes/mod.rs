//! Route gateway for the `cityweather` proxy service.
//!
//! Each sibling module exports a subrouter; this gateway merges them and
//! attaches the shared [`AppState`], so callers (the binary and the
//! integration tests) never need to know about individual endpoints.
use axum::Router;

use crate::{upstream::UpstreamClient, upstream::UpstreamError, Config};

mod health;
mod weather;

pub use weather::{ApiError, WeatherQuery};

// ---

/// Immutable state shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    // ---
    pub config: Config,
    pub upstream: UpstreamClient,
}

impl AppState {
    // ---
    /// Build the state, including the upstream HTTP client, from `config`.
    pub fn from_config(config: Config) -> Result<Self, UpstreamError> {
        // ---
        let upstream = UpstreamClient::new(
            config.api_url.clone(),
            config.lang.clone(),
            config.upstream_timeout,
        )?;
        Ok(Self { config, upstream })
    }
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(weather::router())
        .merge(health::router())
        .with_state(state)
}
