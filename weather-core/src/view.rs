//! Data contracts for the dashboard's charts and condition backgrounds.

use serde::{Deserialize, Serialize};

use crate::{model::ForecastPoint, timefmt::format_time_for_location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Temperature,
    Precipitation,
    Wind,
}

impl ChartKind {
    pub const fn all() -> &'static [ChartKind] {
        &[ChartKind::Temperature, ChartKind::Precipitation, ChartKind::Wind]
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Temperature => "Temperature",
            ChartKind::Precipitation => "Precipitation",
            ChartKind::Wind => "Wind",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ChartKind::Temperature => "°C",
            ChartKind::Precipitation => "mm",
            ChartKind::Wind => "m/s",
        }
    }

    fn value(self, point: &ForecastPoint) -> f64 {
        match self {
            ChartKind::Temperature => point.temperature_c,
            ChartKind::Precipitation => point.precipitation_mm,
            ChartKind::Wind => point.wind_speed_mps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Local hour label, e.g. "3PM".
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub unit: &'static str,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Smallest and largest values, or `None` for an empty series.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// One series per forecast point, labelled in the place's local time.
pub fn chart_series(kind: ChartKind, points: &[ForecastPoint], tz_offset_secs: i32) -> ChartSeries {
    let points = points
        .iter()
        .map(|p| ChartPoint {
            label: format_time_for_location(p.timestamp, tz_offset_secs),
            value: kind.value(p),
        })
        .collect();

    ChartSeries { kind, unit: kind.unit(), points }
}

/// Background gradient keyed on the condition group ("Clear", "Rain", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTheme {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Haze,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    pub from: String,
    pub to: String,
}

impl ConditionTheme {
    pub fn from_main(main: Option<&str>) -> Self {
        let Some(main) = main else {
            return ConditionTheme::Default;
        };
        match main.to_lowercase().as_str() {
            "clear" => ConditionTheme::Clear,
            "clouds" => ConditionTheme::Clouds,
            "rain" | "drizzle" => ConditionTheme::Rain,
            "thunderstorm" => ConditionTheme::Thunderstorm,
            "snow" => ConditionTheme::Snow,
            "mist" | "fog" | "haze" => ConditionTheme::Haze,
            _ => ConditionTheme::Default,
        }
    }

    /// `theme_color` is only used by `Default`.
    pub fn gradient(self, theme_color: &str) -> Gradient {
        let (from, to) = match self {
            ConditionTheme::Clear => ("#facc15", "#f97316"),
            ConditionTheme::Clouds => ("#9ca3af", "#4b5563"),
            ConditionTheme::Rain => ("#3b82f6", "#1e40af"),
            ConditionTheme::Thunderstorm => ("#6366f1", "#1e3a8a"),
            ConditionTheme::Snow => ("#e0f2fe", "#bae6fd"),
            ConditionTheme::Haze => ("#6b7280", "#374151"),
            ConditionTheme::Default => (theme_color, "#111827"),
        };
        Gradient { from: from.to_string(), to: to.to_string() }
    }
}
