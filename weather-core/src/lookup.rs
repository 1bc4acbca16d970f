use crate::{
    Config, WeatherQuery,
    cache::ReportCache,
    model::LookupOutcome,
    provider::{WeatherProvider, provider_from_config},
};

/// Looks up current conditions for free-text city input.
///
/// Owns the provider (and with it the API key) and an optional report cache;
/// both are fixed at construction.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    cache: Option<ReportCache>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider, cache: None }
    }

    pub fn with_cache(mut self, cache: ReportCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the service described by `config`. Fails fast on a missing API key.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let service = Self::new(provider_from_config(config)?);

        Ok(match config.cache_ttl() {
            Some(ttl) => service.with_cache(ReportCache::new(ttl)),
            None => service,
        })
    }

    /// `Ok(None)` for blank input, without touching the network.
    pub async fn lookup(&self, city: &str) -> LookupOutcome {
        let Some(query) = WeatherQuery::parse(city) else {
            tracing::debug!("blank city input, nothing to look up");
            return Ok(None);
        };

        let provider = &self.provider;
        let query = &query;
        let fetch = move || async move {
            let result = provider.current(query).await;
            match &result {
                Ok(report) => tracing::info!(
                    city = query.city(),
                    location = %report.location_name,
                    "fetched current weather"
                ),
                Err(err) => {
                    tracing::warn!(city = query.city(), error = %err, "weather lookup failed")
                }
            }
            result
        };

        let result = match &self.cache {
            Some(cache) => cache.get_or_fetch(&query.cache_key(), fetch).await,
            None => fetch().await,
        };
        result.map(Some)
    }
}
