//! Shared OpenWeather fixtures for the integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use serde_json::{Value, json};
use weatherly_core::{ForecastProjector, OpenWeatherProvider, WeatherQueryPipeline};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// 2024-03-10 12:00:00 UTC
pub const FIRST_DT: i64 = 1_710_072_000;

pub fn pipeline_for(server: &MockServer, timeout: Duration) -> WeatherQueryPipeline {
    let provider =
        OpenWeatherProvider::new(API_KEY.to_string(), &server.uri(), timeout).expect("client");
    WeatherQueryPipeline::new(Arc::new(provider), ForecastProjector::default())
}

pub fn geo_body(name: &str, lat: f64, lon: f64) -> Value {
    json!([{
        "name": name,
        "state": "Lisboa",
        "country": "PT",
        "lat": lat,
        "lon": lon
    }])
}

pub fn current_body(temp: f64, clouds: u8) -> Value {
    json!({
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds"}],
        "main": {"temp": temp, "feels_like": temp - 1.0, "humidity": 64},
        "visibility": 7000,
        "wind": {"speed": 4.6},
        "clouds": {"all": clouds},
        "snow": {"1h": 0.3},
        "timezone": 3600
    })
}

pub fn forecast_body(points: usize) -> Value {
    let list: Vec<Value> = (0..points)
        .map(|i| {
            json!({
                "dt": FIRST_DT + i as i64 * 3 * 3600,
                "main": {"temp": 10.0 + i as f64, "feels_like": 9.0, "humidity": 70},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
                "wind": {"speed": 3.0},
                "clouds": {"all": 75},
                "rain": {"1h": 0.5}
            })
        })
        .collect();
    json!({ "cnt": points, "list": list })
}

pub fn air_body(aqi: u8) -> Value {
    json!({ "list": [{ "main": { "aqi": aqi }, "components": {} }] })
}

pub async fn mount_geo(server: &MockServer, query: &str, body: Value, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", query))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
        .mount(server)
        .await;
}

/// Mounts current, forecast and air-quality endpoints for the given coordinates.
pub async fn mount_lookups(server: &MockServer, lat: &str, temp: f64, clouds: u8, aqi: u8) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", lat))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(temp, clouds)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", lat))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(16)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .and(query_param("lat", lat))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_body(aqi)))
        .mount(server)
        .await;
}
