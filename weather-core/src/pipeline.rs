//! The query pipeline: geocode, fetch the three dependent lookups, derive,
//! project. A pure-ish async function of (input, cancellation token).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    error::QueryError,
    metrics,
    model::QueryResult,
    projector::ForecastProjector,
    provider::WeatherProvider,
};

#[derive(Debug, Clone)]
pub struct WeatherQueryPipeline {
    provider: Arc<dyn WeatherProvider>,
    projector: ForecastProjector,
}

impl WeatherQueryPipeline {
    pub fn new(provider: Arc<dyn WeatherProvider>, projector: ForecastProjector) -> Self {
        Self { provider, projector }
    }

    /// Trimmed place text, or `Validation` when nothing is left.
    pub fn validate(place_text: &str) -> Result<&str, QueryError> {
        let trimmed = place_text.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Validation);
        }
        Ok(trimmed)
    }

    /// Run one query to completion or until `cancel` fires.
    ///
    /// Either every lookup succeeds and a full result is returned, or the
    /// query fails as a whole.
    pub async fn query(
        &self,
        place_text: &str,
        cancel: &CancellationToken,
    ) -> Result<QueryResult, QueryError> {
        let place_text = Self::validate(place_text)?;

        tracing::info!(query = place_text, "Starting weather query");

        let place = until_cancelled(cancel, self.provider.geocode(place_text))
            .await?
            .map_err(log_fetch_failure)?
            .ok_or_else(|| QueryError::NotFound(place_text.to_string()))?;

        tracing::debug!(
            place = %place.display_name(),
            lat = place.latitude,
            lon = place.longitude,
            "Resolved place"
        );

        let (lat, lon) = (place.latitude, place.longitude);
        let lookups = async {
            tokio::try_join!(
                self.provider.current(lat, lon),
                self.provider.forecast(lat, lon),
                self.provider.air_quality(lat, lon),
            )
        };
        let (current, forecast, air_quality) =
            until_cancelled(cancel, lookups).await?.map_err(log_fetch_failure)?;

        tracing::debug!(
            points = forecast.len(),
            aqi = air_quality.index.index(),
            "Fetched conditions"
        );

        let metrics = metrics::derive(&current);
        let forecast = self.projector.project(&forecast);

        Ok(QueryResult { place, current, air_quality, metrics, forecast })
    }
}

async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, QueryError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(QueryError::Cancelled),
        out = fut => Ok(out),
    }
}

fn log_fetch_failure(err: anyhow::Error) -> QueryError {
    tracing::warn!("Weather fetch failed: {err:#}");
    QueryError::Fetch(err)
}
