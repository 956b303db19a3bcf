use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    metrics::precipitation_mm,
    model::{AirQuality, AqiLevel, Condition, CurrentConditions, ForecastPoint, Place},
};

use super::WeatherProvider;

/// Unit system is fixed; every temperature in the crate is Celsius.
const UNITS: &str = "metric";

/// Reported when the provider omits visibility; it caps the field at 10 km.
const DEFAULT_VISIBILITY_M: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    /// GET `{base_url}{path}` with the API key appended, returning the parsed body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(%url, what, "OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }

    fn coordinate_params(lat: f64, lon: f64, with_units: bool) -> Vec<(&'static str, String)> {
        let mut params = vec![("lat", lat.to_string()), ("lon", lon.to_string())];
        if with_units {
            params.push(("units", UNITS.to_string()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoCandidate {
    name: String,
    state: Option<String>,
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwVolume {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
    visibility: Option<u32>,
    timezone: i32,
    rain: Option<OwVolume>,
    snow: Option<OwVolume>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
    rain: Option<OwVolume>,
    snow: Option<OwVolume>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAirMain,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirEntry>,
}

fn first_condition(weather: &[OwWeather]) -> Condition {
    weather
        .first()
        .map(|w| Condition { code: w.id, main: w.main.clone(), description: w.description.clone() })
        .unwrap_or_default()
}

fn volume(v: &Option<OwVolume>) -> Option<f64> {
    v.as_ref().and_then(|v| v.one_hour)
}

impl From<OwGeoCandidate> for Place {
    fn from(c: OwGeoCandidate) -> Self {
        Place {
            name: c.name,
            admin_region: c.state,
            country: c.country,
            latitude: c.lat,
            longitude: c.lon,
        }
    }
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(r: OwCurrentResponse) -> Self {
        CurrentConditions {
            temperature_c: r.main.temp,
            feels_like_c: r.main.feels_like.unwrap_or(r.main.temp),
            humidity_pct: r.main.humidity,
            wind_speed_mps: r.wind.speed,
            cloud_cover_pct: r.clouds.all,
            visibility_m: r.visibility.unwrap_or(DEFAULT_VISIBILITY_M),
            condition: first_condition(&r.weather),
            timezone_offset_secs: r.timezone,
            precipitation_mm: precipitation_mm(volume(&r.rain), volume(&r.snow)),
        }
    }
}

impl From<OwForecastEntry> for ForecastPoint {
    fn from(e: OwForecastEntry) -> Self {
        ForecastPoint {
            timestamp: e.dt,
            temperature_c: e.main.temp,
            humidity_pct: e.main.humidity,
            wind_speed_mps: e.wind.speed,
            cloud_cover_pct: e.clouds.all,
            condition: first_condition(&e.weather),
            precipitation_mm: precipitation_mm(volume(&e.rain), volume(&e.snow)),
        }
    }
}

fn air_quality_from(parsed: OwAirResponse) -> Result<AirQuality> {
    let entry = parsed
        .list
        .first()
        .ok_or_else(|| anyhow!("OpenWeather air quality response contained no data"))?;

    let index = AqiLevel::from_index(entry.main.aqi).ok_or_else(|| {
        anyhow!("OpenWeather air quality index {} is outside 1..=5", entry.main.aqi)
    })?;

    Ok(AirQuality { index })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, query: &str) -> Result<Option<Place>> {
        let params = [("q", query.to_string()), ("limit", "1".to_string())];
        let candidates: Vec<OwGeoCandidate> =
            self.get_json("geocoding", "/geo/1.0/direct", &params).await?;

        Ok(candidates.into_iter().next().map(Place::from))
    }

    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentConditions> {
        let params = Self::coordinate_params(lat, lon, true);
        let parsed: OwCurrentResponse =
            self.get_json("current weather", "/data/2.5/weather", &params).await?;

        Ok(parsed.into())
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastPoint>> {
        let params = Self::coordinate_params(lat, lon, true);
        let parsed: OwForecastResponse =
            self.get_json("5-day forecast", "/data/2.5/forecast", &params).await?;

        Ok(parsed.list.into_iter().map(ForecastPoint::from).collect())
    }

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality> {
        let params = Self::coordinate_params(lat, lon, false);
        let parsed: OwAirResponse =
            self.get_json("air quality", "/data/2.5/air_pollution", &params).await?;

        air_quality_from(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
