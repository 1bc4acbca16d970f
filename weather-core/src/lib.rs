//! Core library for the `weather` CLI and the `weather-web` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap current-conditions provider
//! - Shared domain models and the lookup error taxonomy
//! - A short-lived report cache and the lookup service that uses it
//! - Presentation of lookup outcomes
//!
//! Both binaries build a [`WeatherService`] once at startup and call
//! [`WeatherService::lookup`] per user action.

pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod present;
pub mod provider;

#[cfg(test)]
mod test_support;

pub use cache::ReportCache;
pub use config::Config;
pub use error::LookupError;
pub use lookup::WeatherService;
pub use model::{LookupOutcome, Temperatures, WeatherQuery, WeatherReport};
pub use provider::{WeatherProvider, provider_from_config};
