//! Per-user search context: what the dashboard currently shows and which query
//! is allowed to change it.
//!
//! Each search gets its own cancellation token. Starting a search cancels the
//! previous token and bumps a generation counter under the same lock that
//! publication checks, so the last search *started* is the only one whose
//! outcome is ever published.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    Config,
    error::QueryError,
    model::QueryResult,
    pipeline::WeatherQueryPipeline,
    projector::ForecastProjector,
    provider::provider_from_config,
};

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub query: String,
    pub result: Option<Arc<QueryResult>>,
    pub error: Option<&'static str>,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    in_flight: Option<CancellationToken>,
    snapshot: SessionSnapshot,
}

#[derive(Debug)]
pub struct QuerySession {
    pipeline: WeatherQueryPipeline,
    state: Mutex<SessionState>,
}

impl QuerySession {
    pub fn new(pipeline: WeatherQueryPipeline) -> Self {
        Self { pipeline, state: Mutex::new(SessionState::default()) }
    }

    /// Session backed by the OpenWeather client described in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        let pipeline =
            WeatherQueryPipeline::new(Arc::new(provider), ForecastProjector::new(config.projection()));
        Ok(Self::new(pipeline))
    }

    /// Validate, cancel whatever is in flight, run the query and publish its outcome.
    ///
    /// Returns `Cancelled` when a later search (or [`clear`](Self::clear))
    /// superseded this one; in that case nothing was published.
    pub async fn search(&self, place_text: &str) -> Result<Arc<QueryResult>, QueryError> {
        if let Err(err) = WeatherQueryPipeline::validate(place_text) {
            self.state.lock().snapshot.error = err.user_message();
            return Err(err);
        }

        let (generation, token) = self.begin(place_text);
        let _pending = PendingSearch { session: self, generation };
        let outcome = self.pipeline.query(place_text, &token).await;
        self.finish(generation, &token, outcome)
    }

    fn begin(&self, place_text: &str) -> (u64, CancellationToken) {
        let mut state = self.state.lock();
        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
            tracing::debug!(generation = state.generation, "Cancelled superseded query");
        }

        state.generation += 1;
        let token = CancellationToken::new();
        state.in_flight = Some(token.clone());
        state.snapshot = SessionSnapshot {
            query: place_text.trim().to_string(),
            result: None,
            error: None,
            loading: true,
        };

        (state.generation, token)
    }

    fn finish(
        &self,
        generation: u64,
        token: &CancellationToken,
        outcome: Result<QueryResult, QueryError>,
    ) -> Result<Arc<QueryResult>, QueryError> {
        let mut state = self.state.lock();
        if token.is_cancelled() || state.generation != generation {
            tracing::debug!(generation, "Discarding outcome of superseded query");
            return Err(QueryError::Cancelled);
        }

        state.in_flight = None;
        state.snapshot.loading = false;

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                tracing::info!(place = %result.place.display_name(), "Published weather");
                state.snapshot.result = Some(Arc::clone(&result));
                state.snapshot.error = None;
                Ok(result)
            }
            Err(err) => {
                state.snapshot.error = err.user_message();
                Err(err)
            }
        }
    }

    /// Release a search that never reached `finish` because its future was
    /// dropped. No-op once the search has finished or been superseded.
    fn abandon(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.generation != generation {
            return;
        }
        if let Some(token) = state.in_flight.take() {
            token.cancel();
            state.snapshot.loading = false;
            tracing::debug!(generation, "Search dropped before completion");
        }
    }

    /// Abandon the in-flight query, keeping whatever is currently shown.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if let Some(token) = state.in_flight.take() {
            token.cancel();
            state.snapshot.loading = false;
            tracing::info!("Weather query cancelled");
        }
    }

    /// Abandon the in-flight query and reset everything shown.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        if let Some(token) = state.in_flight.take() {
            token.cancel();
        }
        state.generation += 1;
        state.snapshot = SessionSnapshot::default();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().snapshot.clone()
    }
}

/// Held across the await in [`QuerySession::search`].
struct PendingSearch<'a> {
    session: &'a QuerySession,
    generation: u64,
}

impl Drop for PendingSearch<'_> {
    fn drop(&mut self) {
        self.session.abandon(self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metrics,
        model::{
            AirQuality, AqiLevel, Condition, CurrentConditions, ForecastPoint, ForecastProjection,
            Place,
        },
        provider::WeatherProvider,
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct UnreachableProvider;

    #[async_trait]
    impl WeatherProvider for UnreachableProvider {
        async fn geocode(&self, _query: &str) -> anyhow::Result<Option<Place>> {
            anyhow::bail!("offline")
        }
        async fn current(&self, _lat: f64, _lon: f64) -> anyhow::Result<CurrentConditions> {
            anyhow::bail!("offline")
        }
        async fn forecast(&self, _lat: f64, _lon: f64) -> anyhow::Result<Vec<ForecastPoint>> {
            anyhow::bail!("offline")
        }
        async fn air_quality(&self, _lat: f64, _lon: f64) -> anyhow::Result<AirQuality> {
            anyhow::bail!("offline")
        }
    }

    fn session() -> QuerySession {
        QuerySession::new(WeatherQueryPipeline::new(
            Arc::new(UnreachableProvider),
            ForecastProjector::default(),
        ))
    }

    fn result(name: &str) -> QueryResult {
        let current = CurrentConditions {
            temperature_c: 21.0,
            feels_like_c: 21.0,
            humidity_pct: 40,
            wind_speed_mps: 1.0,
            cloud_cover_pct: 0,
            visibility_m: 10_000,
            condition: Condition::default(),
            timezone_offset_secs: 0,
            precipitation_mm: 0.0,
        };
        QueryResult {
            place: Place {
                name: name.to_string(),
                admin_region: None,
                country: "NL".into(),
                latitude: 52.0,
                longitude: 4.0,
            },
            metrics: metrics::derive(&current),
            current,
            air_quality: AirQuality { index: AqiLevel::Good },
            forecast: ForecastProjection::default(),
        }
    }

    #[test]
    fn late_success_of_superseded_query_is_not_published() {
        let session = session();
        let (first_gen, first_token) = session.begin("Delft");
        let (second_gen, second_token) = session.begin("Leiden");

        assert!(first_token.is_cancelled());
        assert!(!second_token.is_cancelled());

        let late = session.finish(first_gen, &first_token, Ok(result("Delft")));
        assert!(late.unwrap_err().is_cancelled());
        assert!(session.snapshot().result.is_none());
        assert!(session.snapshot().loading);

        let published = session.finish(second_gen, &second_token, Ok(result("Leiden"))).unwrap();
        assert_eq!(published.place.name, "Leiden");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.query, "Leiden");
        assert_eq!(snapshot.result.map(|r| r.place.name.clone()).as_deref(), Some("Leiden"));
        assert!(!snapshot.loading);
    }

    #[test]
    fn cancel_stops_loading_and_discards_outcome() {
        let session = session();
        let (generation, token) = session.begin("Delft");
        session.finish(generation, &token, Ok(result("Delft"))).unwrap();

        let (generation, token) = session.begin("Leiden");
        session.cancel();
        assert!(token.is_cancelled());
        assert!(session.finish(generation, &token, Ok(result("Leiden"))).is_err());
        assert!(!session.snapshot().loading);
    }

    #[test]
    fn abandoned_search_stops_loading_only_for_its_own_generation() {
        let session = session();
        let (first_gen, first_token) = session.begin("Delft");
        let (second_gen, second_token) = session.begin("Leiden");

        // Superseded search dropping late must not touch the newer one.
        session.abandon(first_gen);
        assert!(!second_token.is_cancelled());
        assert!(session.snapshot().loading);

        session.abandon(second_gen);
        assert!(first_token.is_cancelled());
        assert!(second_token.is_cancelled());
        assert!(!session.snapshot().loading);
    }

    #[tokio::test]
    async fn fetch_failure_sets_generic_error() {
        let session = session();
        let err = session.search("Delft").await.unwrap_err();

        assert!(matches!(err, QueryError::Fetch(_)));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.error, Some("Failed to fetch weather. Try again later."));
        assert!(!snapshot.loading);
    }
}
