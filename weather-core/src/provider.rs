use crate::{
    Config, LookupError, WeatherQuery, WeatherReport, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current conditions. One call is one upstream request.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReport, LookupError>;
}

/// Construct the OpenWeatherMap provider from config.
///
/// Fails when no API key is configured, so callers should do this once at startup.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let settings = config.fetch_settings()?;
    Ok(Box::new(OpenWeatherProvider::new(settings)?))
}
