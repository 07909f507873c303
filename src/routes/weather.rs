// src/routes/weather.rs
//! `GET /api/weather?city=<name>`: the credential-hiding proxy endpoint.
//!
//! The handler validates the query, attaches the configured credential,
//! makes exactly one upstream call and re-encodes the outcome. Every failure
//! path ends in an [`ApiError`], which renders as a status code plus an
//! [`ErrorBody`]; upstream details only ever reach the log.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use super::AppState;
use crate::models::{ErrorBody, WeatherReport};
use crate::upstream::UpstreamError;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/weather", get(handler))
}

/// Query parameters accepted by `/api/weather`.
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// Every non-200 outcome of the endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("You must provide the name of a city.")]
    MissingCity,

    #[error("Incomplete server configuration. Check that WEATHER_API_KEY is set in your .env file.")]
    MissingCredential,

    #[error("No weather information was found for that city. Check the spelling and try again.")]
    CityNotFound,

    #[error("The API key is not active yet. Newly created keys can take up to 2 hours to activate.")]
    InvalidCredential,

    #[error("Could not retrieve weather information. Please try again later.")]
    Upstream,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            Self::MissingCity => StatusCode::BAD_REQUEST,
            Self::CityNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::MissingCredential | Self::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound => Self::CityNotFound,
            UpstreamError::Unauthorized => Self::InvalidCredential,
            UpstreamError::Status { .. }
            | UpstreamError::Network(_)
            | UpstreamError::InvalidJson(_)
            | UpstreamError::Malformed(_) => Self::Upstream,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

async fn handler(
    query: Result<Query<WeatherQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<WeatherReport>, ApiError> {
    // ---
    let city = match query {
        Ok(Query(WeatherQuery { city: Some(city) })) if !city.trim().is_empty() => city,
        Ok(_) => {
            warn!("GET /api/weather - rejected: missing city");
            return Err(ApiError::MissingCity);
        }
        Err(rejection) => {
            warn!("GET /api/weather - rejected query: {}", rejection);
            return Err(ApiError::MissingCity);
        }
    };
    let city = city.trim();

    let Some(api_key) = state.config.api_key.as_deref() else {
        error!("GET /api/weather - WEATHER_API_KEY is not configured");
        return Err(ApiError::MissingCredential);
    };

    info!("GET /api/weather - city={:?}", city);

    match state.upstream.current_weather(city, api_key).await {
        Ok(report) => {
            info!(
                "GET /api/weather - {} {}°C {}%",
                report.city, report.temperature_celsius, report.humidity_percent
            );
            Ok(Json(report))
        }
        Err(e) => {
            match &e {
                UpstreamError::NotFound | UpstreamError::Unauthorized => {
                    warn!("GET /api/weather - city={:?}: {}", city, e)
                }
                _ => error!("GET /api/weather - city={:?}: {}", city, e),
            }
            Err(e.into())
        }
    }
}
