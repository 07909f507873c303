//! Data models shared by the proxy endpoint and the client fetcher.
//!
//! The upstream payload is never deserialized straight into a typed struct.
//! It arrives as an untyped [`serde_json::Value`] and every field the
//! normalized [`WeatherReport`] needs is checked explicitly, so a partial or
//! oddly shaped upstream response produces a [`ShapeError`] instead of a
//! half-filled report.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---

/// Normalized weather payload returned by `GET /api/weather`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    // ---
    /// Resolved location name as reported upstream (may differ from the query).
    pub city: String,
    pub temperature_celsius: i64,
    pub humidity_percent: u8,
    pub description: String,
}

/// JSON body of every non-200 proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// A required upstream field was missing or had the wrong shape.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("missing field `{0}`")]
    Missing(&'static str),

    #[error("field `{field}` is not {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("humidity {0} is outside 0-100")]
    HumidityOutOfRange(i64),

    #[error("temperature {0} is outside the plausible range")]
    TemperatureOutOfRange(f64),
}

/// Any upstream temperature beyond this many degrees from zero is rejected.
pub const MAX_ABS_CELSIUS: f64 = 200.0;

impl WeatherReport {
    // ---
    /// Build a report from a successful upstream JSON body.
    ///
    /// Required paths: `main.temp` (number within ±200), `main.humidity` (integer
    /// in 0-100), `weather[0].description` (string) and `name` (string).
    pub fn from_upstream(body: &Value) -> Result<Self, ShapeError> {
        // ---
        let main = body.get("main").ok_or(ShapeError::Missing("main"))?;

        let temp = main
            .get("temp")
            .ok_or(ShapeError::Missing("main.temp"))?
            .as_f64()
            .filter(|t| t.is_finite())
            .ok_or(ShapeError::WrongType {
                field: "main.temp",
                expected: "a finite number",
            })?;
        if temp.abs() > MAX_ABS_CELSIUS {
            return Err(ShapeError::TemperatureOutOfRange(temp));
        }

        let humidity = main
            .get("humidity")
            .ok_or(ShapeError::Missing("main.humidity"))?;
        let humidity = integral(humidity).ok_or(ShapeError::WrongType {
            field: "main.humidity",
            expected: "an integer",
        })?;
        let humidity_percent = u8::try_from(humidity)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or(ShapeError::HumidityOutOfRange(humidity))?;

        let description = body
            .get("weather")
            .ok_or(ShapeError::Missing("weather"))?
            .as_array()
            .ok_or(ShapeError::WrongType {
                field: "weather",
                expected: "an array",
            })?
            .first()
            .ok_or(ShapeError::Missing("weather[0]"))?
            .get("description")
            .ok_or(ShapeError::Missing("weather[0].description"))?
            .as_str()
            .ok_or(ShapeError::WrongType {
                field: "weather[0].description",
                expected: "a string",
            })?;

        let city = body
            .get("name")
            .ok_or(ShapeError::Missing("name"))?
            .as_str()
            .ok_or(ShapeError::WrongType {
                field: "name",
                expected: "a string",
            })?;

        Ok(WeatherReport {
            city: city.to_string(),
            temperature_celsius: round_half_up(temp),
            humidity_percent,
            description: description.to_string(),
        })
    }
}

/// Round to the nearest whole number, halves toward positive infinity
/// (22.5 -> 23, -2.5 -> -2).
pub fn round_half_up(value: f64) -> i64 {
    // `(value + 0.5).floor()` would turn 0.49999999999999994 into 1.
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Accept `65` and `65.0`, reject `65.5`.
fn integral(value: &Value) -> Option<i64> {
    // ---
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}
