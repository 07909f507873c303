//! `cityweather`: look up current weather for a city through a
//! credential-hiding proxy.
//!
//! Module boundaries (EMBP, each parent re-exports what siblings need):
//! - [`config`] – environment-driven [`Config`], credential masking
//! - [`models`] – [`WeatherReport`], [`ErrorBody`], upstream payload validation
//! - [`upstream`] – the one outbound call to the weather provider
//! - [`routes`] – axum gateway: `/api/weather` and `/health`
//! - [`client`] – [`WeatherFetcher`], the typed caller of `/api/weather`
//! - [`ui`] – [`WeatherView`], the idle/loading/success/error state machine

pub mod client;
pub mod config;
pub mod models;
pub mod routes;
pub mod ui;
pub mod upstream;

pub use client::{FetchError, WeatherFetcher};
pub use config::Config;
pub use models::{ErrorBody, WeatherReport};
pub use routes::{router, AppState};
pub use ui::{Phase, SubmitError, Trigger, WeatherView};
