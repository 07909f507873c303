//! Client for the upstream weather service (OpenWeatherMap current-weather API).
//!
//! One call per request, no retries. The first failure is classified into an
//! [`UpstreamError`] and handed back to the route, which decides what the
//! caller gets to see.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{ShapeError, WeatherReport};

/// Path of the current-weather resource below the configured base URL.
pub const WEATHER_PATH: &str = "/data/2.5/weather";

/// Ways an upstream lookup can fail.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream does not know this location")]
    NotFound,

    #[error("upstream rejected the credential")]
    Unauthorized,

    #[error("upstream answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request to upstream failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream body is not JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream body has an unexpected shape: {0}")]
    Malformed(#[from] ShapeError),
}

/// HTTP client bound to one upstream base URL and language.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    lang: String,
}

impl UpstreamClient {
    // ---
    pub fn new(
        base_url: impl Into<String>,
        lang: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        // ---
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            lang: lang.into(),
        })
    }

    /// Fetch current conditions for `city` in metric units.
    pub async fn current_weather(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<WeatherReport, UpstreamError> {
        // ---
        let url = format!("{}{}", self.base_url, WEATHER_PATH);
        debug!("Fetching current weather for {:?} from {}", city, url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", api_key),
                ("units", "metric"),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await?;

        // 404/401 are decided by status alone; their bodies are never read.
        let body = match res.status() {
            StatusCode::NOT_FOUND => return Err(UpstreamError::NotFound),
            StatusCode::UNAUTHORIZED => return Err(UpstreamError::Unauthorized),
            status if !status.is_success() => {
                let body = res.text().await.unwrap_or_default();
                return Err(UpstreamError::Status {
                    status,
                    body: truncate_body(&body),
                });
            }
            _ => res.text().await?,
        };

        let value: Value = serde_json::from_str(&body)?;
        debug!("Upstream raw response: {}", value);

        Ok(WeatherReport::from_upstream(&value)?)
    }
}

fn truncate_body(body: &str) -> String {
    // ---
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
