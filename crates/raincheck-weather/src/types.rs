use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Fallback location (central London) used when no city is given or
    /// geocoding fails.
    pub const DEFAULT: Self = Self {
        latitude: 51.5074,
        longitude: -0.1278,
    };
}

/// Interpretation of a single-day forecast response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RainReport {
    /// Positive precipitation sum, in millimetres.
    Rain(f64),
    /// Exactly zero precipitation.
    NoRain,
    /// Negative sentinel value from the API.
    Unknown,
}

impl RainReport {
    /// Read `daily.precipitation_sum[0]` out of a raw forecast response.
    ///
    /// # Errors
    /// Returns [`WeatherError::Parse`] when the expected structure is
    /// missing or the value is not a number.
    pub fn from_response(response: &Value) -> Result<Self, WeatherError> {
        let value = response
            .get("daily")
            .and_then(|daily| daily.get("precipitation_sum"))
            .and_then(|sums| sums.get(0))
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                WeatherError::Parse("missing daily.precipitation_sum[0]".to_string())
            })?;

        Ok(if value > 0.0 {
            Self::Rain(value)
        } else if value == 0.0 {
            Self::NoRain
        } else {
            Self::Unknown
        })
    }

    /// Console message for this report.
    pub fn message(&self) -> String {
        match self {
            Self::Rain(mm) => format!("It will rain. Precipitation value: {} mm", mm),
            Self::NoRain => "It will not rain.".to_string(),
            Self::Unknown => "I don't know! (No data or negative value)".to_string(),
        }
    }
}

/// Weather service errors.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Forecast API returned status {status}")]
    Api { status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Cache error: {0}")]
    Cache(#[from] std::io::Error),
}
