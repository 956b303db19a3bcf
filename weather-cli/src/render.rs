//! Text and JSON rendering of a published query result.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use weatherly_core::{
    ChartKind, ChartSeries, Config, ConditionTheme, QueryResult, chart_series,
    format_date_for_location, format_time_for_location, format_today_for_location,
};

const BAR_WIDTH: f64 = 30.0;

pub fn dashboard<'a>(
    result: &'a QueryResult,
    chart: ChartKind,
    config: &'a Config,
) -> Dashboard<'a> {
    dashboard_at(result, chart, config, Utc::now())
}

fn dashboard_at<'a>(
    result: &'a QueryResult,
    chart: ChartKind,
    config: &'a Config,
    now: DateTime<Utc>,
) -> Dashboard<'a> {
    Dashboard { result, chart, config, now }
}

/// Text dashboard for one result, dated as seen from the place at `now`.
pub struct Dashboard<'a> {
    result: &'a QueryResult,
    chart: ChartKind,
    config: &'a Config,
    now: DateTime<Utc>,
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let tz = result.current.timezone_offset_secs;
        let current = &result.current;
        let metrics = &result.metrics;
        let aqi = result.air_quality.index;

        writeln!(f, "{}", result.place.display_name())?;
        writeln!(f, "{}", format_date_for_location(self.now, tz))?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<28}Humidity: {}%",
            format!("Temperature: {:.0}°C", current.temperature_c),
            current.humidity_pct
        )?;
        writeln!(
            f,
            "{:<28}Air Quality: {} ({})",
            format!("Wind: {} m/s", current.wind_speed_mps),
            aqi.label(),
            aqi.color()
        )?;
        writeln!(
            f,
            "{:<28}Brightness Index: {}",
            format!("Max UV Index: {:.1}", metrics.uv_estimate),
            metrics.brightness_tier.value()
        )?;
        writeln!(
            f,
            "{:<28}Visibility: {} km",
            format!("Cloud Cover: {}%", current.cloud_cover_pct),
            metrics.visibility_km
        )?;
        writeln!(f, "Cloud Ceiling: {} m", metrics.cloud_ceiling_m)?;
        writeln!(f, "Condition: {}", current.condition.description)?;

        if !result.forecast.extended.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "{}-Hour Forecast ({}-hour intervals)",
                self.config.forecast_horizon_hours, self.config.forecast_spacing_hours
            )?;
            for point in &result.forecast.extended {
                writeln!(
                    f,
                    "  {:>4}  {:>4}  {:<13} {:>5} mm  {:>5} m/s  {:>3}%",
                    format_time_for_location(point.timestamp, tz),
                    format!("{:.0}°C", point.temperature_c),
                    point.condition.main,
                    point.precipitation_mm,
                    point.wind_speed_mps,
                    point.humidity_pct,
                )?;
            }
        }

        if !result.forecast.short.is_empty() {
            writeln!(f)?;
            let series = chart_series(self.chart, &result.forecast.short, tz);
            write!(f, "{}", BarChart(&series))?;
        }

        Ok(())
    }
}

/// Horizontal bars scaled between the series' minimum and maximum.
struct BarChart<'a>(&'a ChartSeries);

impl fmt::Display for BarChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let series = self.0;
        writeln!(f, "{} ({})", series.kind.title(), series.unit)?;

        let Some((lo, hi)) = series.range() else {
            return Ok(());
        };
        let span = hi - lo;

        for point in &series.points {
            let fraction = if span > 0.0 { (point.value - lo) / span } else { 1.0 };
            let width = 1 + (fraction * BAR_WIDTH).round() as usize;
            writeln!(f, "  {:>4} {} {:.1}", point.label, "#".repeat(width), point.value)?;
        }
        Ok(())
    }
}

pub fn json_document(result: &QueryResult, config: &Config) -> Value {
    let tz = result.current.timezone_offset_secs;
    let charts: Vec<ChartSeries> = ChartKind::all()
        .iter()
        .map(|kind| chart_series(*kind, &result.forecast.short, tz))
        .collect();
    let theme = ConditionTheme::from_main(Some(result.current.condition.main.as_str()));

    json!({
        "heading": result.place.display_name(),
        "date": format_today_for_location(tz),
        "air_quality": {
            "label": result.air_quality.index.label(),
            "color": result.air_quality.index.color(),
        },
        "background": theme.gradient(&config.theme_color),
        "result": result,
        "charts": charts,
    })
}
