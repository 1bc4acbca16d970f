use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Outcome of a single lookup. `Ok(None)` means there was nothing to look up.
pub type LookupOutcome = Result<Option<WeatherReport>, LookupError>;

/// A trimmed, non-empty city name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeatherQuery {
    city: String,
}

impl WeatherQuery {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let city = raw.trim();
        if city.is_empty() {
            return None;
        }

        Some(Self { city: city.to_string() })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Key used by the report cache; lookups are case-insensitive upstream.
    pub fn cache_key(&self) -> String {
        self.city.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    pub current_c: f64,
    pub feels_like_c: f64,
    pub min_c: f64,
    pub max_c: f64,
}

/// Normalized current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub country_code: String,
    pub observation_time: DateTime<Utc>,
    pub temperature: Temperatures,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,

    pub visibility_m: Option<u32>,
    pub cloudiness_pct: Option<u8>,
    pub rain_1h_mm: Option<f64>,
    pub snow_1h_mm: Option<f64>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

impl WeatherReport {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}
