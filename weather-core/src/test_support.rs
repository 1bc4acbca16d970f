//! Fixtures shared by the unit tests in this crate.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    LookupError, WeatherQuery, WeatherReport,
    provider::{
        WeatherProvider,
        openweather::{FetchSettings, parse_current},
    },
};

pub const TEST_KEY: &str = "TEST_KEY";

pub fn settings_for(base_url: &str) -> FetchSettings {
    FetchSettings {
        api_key: TEST_KEY.to_string(),
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    }
}

/// A trimmed-down but realistic current-weather body for London.
pub fn london_body() -> Value {
    json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [
            { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }
        ],
        "base": "stations",
        "main": {
            "temp": 12.3,
            "feels_like": 11.6,
            "temp_min": 10.9,
            "temp_max": 13.4,
            "pressure": 1012,
            "humidity": 81
        },
        "visibility": 10000,
        "wind": { "speed": 4.63, "deg": 240 },
        "rain": { "1h": 0.42 },
        "clouds": { "all": 75 },
        "dt": 1_700_000_000,
        "sys": {
            "type": 2,
            "id": 2075535,
            "country": "GB",
            "sunrise": 1_699_945_800,
            "sunset": 1_699_978_500
        },
        "timezone": 0,
        "id": 2643743,
        "name": "London",
        "cod": 200
    })
}

pub fn london_report() -> WeatherReport {
    parse_current(&london_body().to_string()).expect("fixture parses")
}

/// Provider that replays one canned outcome and counts how often it was asked.
#[derive(Debug, Clone)]
pub struct CountingProvider {
    outcome: Result<WeatherReport, LookupError>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl CountingProvider {
    pub fn new(outcome: Result<WeatherReport, LookupError>) -> Self {
        Self { outcome, delay: Duration::ZERO, calls: Arc::new(AtomicUsize::new(0)) }
    }

    /// Make every call take `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl WeatherProvider for CountingProvider {
    async fn current(&self, _query: &WeatherQuery) -> Result<WeatherReport, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}
