//! Typed client for the proxy's `GET /api/weather` endpoint.
//!
//! [`WeatherFetcher::fetch`] makes exactly one request per call and returns
//! an explicit `Result`. A non-success status becomes [`FetchError::Status`]
//! carrying the server's `error` text verbatim, or a generic fallback when
//! the error body cannot be read. Input is passed through untouched:
//! rejecting empty queries is the caller's job (see [`crate::ui`]).

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

use crate::models::{ErrorBody, WeatherReport};

/// Shown whenever the server gave no usable message.
pub const FALLBACK_MESSAGE: &str = "Could not retrieve weather information";

#[derive(Debug, Error)]
pub enum FetchError {
    /// The proxy answered with a non-success status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The request never produced a response (connection, timeout).
    #[error("Could not retrieve weather information")]
    Transport(#[source] reqwest::Error),

    /// A success response whose body is not a weather report.
    #[error("Could not retrieve weather information")]
    Decode(#[source] reqwest::Error),
}

impl FetchError {
    /// HTTP status reported by the proxy, if it answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    http: Client,
    endpoint: Url,
}

impl WeatherFetcher {
    // ---
    /// Create a fetcher for the proxy rooted at `base_url`
    /// (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        // ---
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        let endpoint = base.join("api/weather")?;
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http, endpoint })
    }

    /// Full request URL for `city`, with the city percent-encoded.
    pub fn request_url(&self, city: &str) -> Url {
        // ---
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().clear().append_pair("city", city);
        url
    }

    pub async fn fetch(&self, city: &str) -> Result<WeatherReport, FetchError> {
        // ---
        let url = self.request_url(city);
        debug!("GET {}", url);

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            // Unreadable bodies fall back to the generic message.
            let message = res
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            debug!("Proxy answered {}: {}", status, message);
            return Err(FetchError::Status { status, message });
        }

        res.json::<WeatherReport>().await.map_err(FetchError::Decode)
    }
}
