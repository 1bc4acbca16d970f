use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::{fmt, time::Duration};

use crate::{
    error::LookupError,
    model::{Temperatures, WeatherQuery, WeatherReport},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Value of `cod` the API puts in the body for an unknown city.
const NOT_FOUND_CODE: &str = "404";

/// Everything the provider needs to reach the API.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for FetchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider").field("endpoint", &self.endpoint).finish()
    }
}

impl OpenWeatherProvider {
    pub fn new(settings: FetchSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        let endpoint =
            format!("{}{}", settings.base_url.trim_end_matches('/'), CURRENT_WEATHER_PATH);

        Ok(Self { api_key: settings.api_key, endpoint, http })
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherReport, LookupError> {
        tracing::debug!(city, endpoint = %self.endpoint, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city), ("units", "metric"), ("APPID", self.api_key.as_str())])
            .send()
            .await
            .map_err(LookupError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(LookupError::from_transport)?;

        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(
                city,
                %status,
                body = %truncate_body(&body),
                "OpenWeather current request failed"
            );
            return Err(LookupError::NotFound);
        }

        parse_current(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError> {
        self.fetch_current(query.city()).await
    }
}

/// Parse a current-weather body, honouring the in-body not-found sentinel.
pub fn parse_current(body: &str) -> Result<WeatherReport, LookupError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| LookupError::MalformedResponse(format!("invalid JSON: {e}")))?;

    if is_not_found(&value) {
        return Err(LookupError::NotFound);
    }

    let parsed: OwCurrentResponse = serde_json::from_value(value)
        .map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

    parsed.into_report()
}

// `cod` is a string on errors ("404") and a number on success (200).
fn is_not_found(value: &Value) -> bool {
    match value.get("cod") {
        Some(Value::String(code)) => code == NOT_FOUND_CODE,
        Some(Value::Number(code)) => code.to_string() == NOT_FOUND_CODE,
        _ => false,
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    visibility: Option<u32>,
    clouds: Option<OwClouds>,
    rain: Option<OwPrecipitation>,
    snow: Option<OwPrecipitation>,
}

impl OwCurrentResponse {
    fn into_report(self) -> Result<WeatherReport, LookupError> {
        let observation_time = unix_to_utc(self.dt).ok_or_else(|| {
            LookupError::MalformedResponse(format!("observation time out of range: {}", self.dt))
        })?;

        let condition = self.weather.into_iter().next().ok_or_else(|| {
            LookupError::MalformedResponse("response contained no weather conditions".into())
        })?;

        Ok(WeatherReport {
            location_name: self.name,
            country_code: self.sys.country,
            observation_time,
            temperature: Temperatures {
                current_c: self.main.temp,
                feels_like_c: self.main.feels_like,
                min_c: self.main.temp_min,
                max_c: self.main.temp_max,
            },
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            wind_speed_mps: self.wind.speed,
            description: condition.description,
            icon: condition.icon,
            visibility_m: self.visibility,
            // An empty `clouds`/`rain`/`snow` object still means "reported, zero".
            cloudiness_pct: self.clouds.map(|c| c.all.unwrap_or(0)),
            rain_1h_mm: self.rain.map(|r| r.one_hour.unwrap_or(0.0)),
            snow_1h_mm: self.snow.map(|s| s.one_hour.unwrap_or(0.0)),
            sunrise: self.sys.sunrise.and_then(unix_to_utc),
            sunset: self.sys.sunset.and_then(unix_to_utc),
        })
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
