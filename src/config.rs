//! Configuration loader for the `cityweather` proxy service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Handlers never read the environment themselves:
//! the loaded [`Config`] is injected into the router state, which also lets
//! tests build a configuration directly without touching process state.
//!
//! The upstream credential is deliberately optional here. A missing key does
//! not stop the service from starting; each weather request answers with a
//! 500 until the deployment is fixed.
use std::{env, net::SocketAddr, time::Duration};

use anyhow::{anyhow, Result};

/// Default upstream base URL (OpenWeatherMap).
pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org";

/// Parse an optional integer variable with a default value.
macro_rules! parse_env_u64 {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string variable, treating blank as unset.
macro_rules! optional_env {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Clone)]
pub struct Config {
    // ---
    /// Upstream credential (`appid`). `None` means the deployment is incomplete.
    pub api_key: Option<String>,

    /// Upstream base URL, without the `/data/2.5/weather` path.
    pub api_url: String,

    /// Response language requested from upstream.
    pub lang: String,

    /// Timeout applied to every upstream request.
    pub upstream_timeout: Duration,

    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            lang: "es".to_string(),
            upstream_timeout: Duration::from_secs(10),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

// Keeps the credential out of `{:?}` output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.masked_api_key())
            .field("api_url", &self.api_url)
            .field("lang", &self.lang)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `WEATHER_API_KEY` – upstream credential (absence answers 500 per request)
/// - `WEATHER_API_URL` – upstream base URL (default: OpenWeatherMap)
/// - `WEATHER_LANG` – upstream response language (default: `es`)
/// - `UPSTREAM_TIMEOUT_SECS` – upstream request timeout (default: 10)
/// - `BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|name| env::var(name).ok())
}

/// Load configuration through `lookup` instead of the process environment.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let defaults = Config::default();

    let api_key = optional_env!(lookup, "WEATHER_API_KEY");
    let api_url = optional_env!(lookup, "WEATHER_API_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or(defaults.api_url);
    let lang = optional_env!(lookup, "WEATHER_LANG").unwrap_or(defaults.lang);

    let timeout_secs = parse_env_u64!(
        lookup,
        "UPSTREAM_TIMEOUT_SECS",
        defaults.upstream_timeout.as_secs()
    );
    if timeout_secs == 0 {
        return Err(anyhow!("Invalid UPSTREAM_TIMEOUT_SECS: must be at least 1"));
    }
    let upstream_timeout = Duration::from_secs(timeout_secs);

    let bind_addr = optional_env!(lookup, "BIND_ADDR")
        .map(|addr| addr.parse::<SocketAddr>())
        .transpose()
        .map_err(|e| anyhow!("Invalid BIND_ADDR: {}", e))?
        .unwrap_or(defaults.bind_addr);

    Ok(Config {
        api_key,
        api_url,
        lang,
        upstream_timeout,
        bind_addr,
    })
}

impl Config {
    // ---
    /// Credential with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        // ---
        match &self.api_key {
            None => "<not set>".to_string(),
            Some(key) if key.chars().count() <= 4 => "****".to_string(),
            Some(key) => {
                let tail: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("****{}", tail)
            }
        }
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// The credential is masked. A missing credential is logged as a warning
    /// because every weather request will fail until it is set.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  WEATHER_API_KEY       : {}", self.masked_api_key());
        tracing::info!("  WEATHER_API_URL       : {}", self.api_url);
        tracing::info!("  WEATHER_LANG          : {}", self.lang);
        tracing::info!("  UPSTREAM_TIMEOUT_SECS : {}", self.upstream_timeout.as_secs());
        tracing::info!("  BIND_ADDR             : {}", self.bind_addr);

        if self.api_key.is_none() {
            tracing::warn!("WEATHER_API_KEY is not set; /api/weather will answer 500");
        }
    }
}
