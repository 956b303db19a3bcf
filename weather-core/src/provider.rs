use crate::{
    Config,
    model::{AirQuality, CurrentConditions, ForecastPoint, Place},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The four read-only lookups a query needs.
///
/// Errors are `anyhow` chains carrying provider detail for logs; the pipeline
/// collapses them into a single user-facing fetch failure.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Best match for free text, or `None` when nothing matches.
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Place>>;

    async fn current(&self, lat: f64, lon: f64) -> anyhow::Result<CurrentConditions>;

    /// Points in ascending time order.
    async fn forecast(&self, lat: f64, lon: f64) -> anyhow::Result<Vec<ForecastPoint>>;

    async fn air_quality(&self, lat: f64, lon: f64) -> anyhow::Result<AirQuality>;
}

/// Construct the OpenWeather client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;
    OpenWeatherProvider::new(api_key, &config.base_url, config.request_timeout())
}
