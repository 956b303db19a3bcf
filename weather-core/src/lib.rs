//! Core library for the `weatherly` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `WeatherProvider` seam
//! - The cancelable query pipeline and the session that publishes its results
//! - Derived metrics, forecast projections and local-time formatting
//!
//! It is used by `weatherly-cli`, but any front end can drive a [`QuerySession`]
//! and render the values it publishes.

pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod projector;
pub mod provider;
pub mod session;
pub mod timefmt;
pub mod view;

pub use config::Config;
pub use error::QueryError;
pub use model::{
    AirQuality, AqiLevel, BrightnessTier, Condition, CurrentConditions, DerivedMetrics,
    ForecastPoint, ForecastProjection, Place, QueryResult,
};
pub use pipeline::WeatherQueryPipeline;
pub use projector::{ForecastProjector, ProjectionSettings};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use session::{QuerySession, SessionSnapshot};
pub use timefmt::{format_date_for_location, format_time_for_location, format_today_for_location};
pub use view::{ChartKind, ChartPoint, ChartSeries, ConditionTheme, Gradient, chart_series};

pub use tokio_util::sync::CancellationToken;
