use serde::{Deserialize, Serialize};

/// A geocoded place. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    /// State/province, when the provider knows one.
    pub admin_region: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    /// Heading used by the dashboard, e.g. "Springfield, Illinois, US".
    pub fn display_name(&self) -> String {
        match self.admin_region.as_deref().filter(|r| !r.is_empty()) {
            Some(region) => format!("{}, {}, {}", self.name, region, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// Provider condition: numeric code, short group name ("Clouds") and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub code: i64,
    pub main: String,
    pub description: String,
}

impl Default for Condition {
    fn default() -> Self {
        Self { code: 0, main: "Unknown".to_string(), description: "Unknown".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub cloud_cover_pct: u8,
    pub visibility_m: u32,
    pub condition: Condition,
    /// Seconds east of UTC for the resolved place.
    pub timezone_offset_secs: i32,
    /// mm over the last hour (non-zero rain, else snow, else 0).
    pub precipitation_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Unix seconds, UTC.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub cloud_cover_pct: u8,
    pub condition: Condition,
    pub precipitation_mm: f64,
}

/// Coarse air-quality ordinal reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AqiLevel {
    Good = 1,
    Fair = 2,
    Moderate = 3,
    Poor = 4,
    VeryPoor = 5,
}

impl AqiLevel {
    /// Map a provider index to a level. Anything outside 1..=5 is `None`.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Good),
            2 => Some(Self::Fair),
            3 => Some(Self::Moderate),
            4 => Some(Self::Poor),
            5 => Some(Self::VeryPoor),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }

    /// Display color as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Self::Good => "#22c55e",
            Self::Fair => "#a3e635",
            Self::Moderate => "#facc15",
            Self::Poor => "#f97316",
            Self::VeryPoor => "#ef4444",
        }
    }
}

impl std::fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQuality {
    pub index: AqiLevel,
}

/// Ambient light estimate, 1 (dim) to 4 (bright).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8")]
#[serde(try_from = "u8")]
pub enum BrightnessTier {
    Dim = 1,
    Overcast = 2,
    Hazy = 3,
    Bright = 4,
}

impl BrightnessTier {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl From<BrightnessTier> for u8 {
    fn from(tier: BrightnessTier) -> Self {
        tier.value()
    }
}

impl TryFrom<u8> for BrightnessTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Dim),
            2 => Ok(Self::Overcast),
            3 => Ok(Self::Hazy),
            4 => Ok(Self::Bright),
            other => Err(format!("brightness tier out of range: {other}")),
        }
    }
}

/// Values computed from fetched data; never fetched themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub uv_estimate: f64,
    pub brightness_tier: BrightnessTier,
    pub cloud_ceiling_m: u32,
    pub visibility_km: f64,
}

/// The two forecast views handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastProjection {
    pub short: Vec<ForecastPoint>,
    pub extended: Vec<ForecastPoint>,
}

/// Everything one successful query produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub place: Place,
    pub current: CurrentConditions,
    pub air_quality: AirQuality,
    pub metrics: DerivedMetrics,
    pub forecast: ForecastProjection,
}
