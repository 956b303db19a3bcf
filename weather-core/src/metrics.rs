//! Secondary metrics computed from already-fetched conditions.
//!
//! None of these are measurements. The UV figure in particular is a heuristic
//! proxy built from temperature and cloud cover, not a real UV index.

use crate::model::{BrightnessTier, CurrentConditions, DerivedMetrics};

pub const UV_MIN: f64 = 0.5;
pub const UV_MAX: f64 = 11.0;

/// One row of the brightness table: matches when `uv < uv_below` and
/// `cloud_cover > cloud_above`.
struct BrightnessRule {
    uv_below: f64,
    cloud_above: u8,
    tier: BrightnessTier,
}

/// Evaluated top to bottom, first match wins. Rows overlap on purpose, so the
/// order is part of the behavior.
const BRIGHTNESS_RULES: &[BrightnessRule] = &[
    BrightnessRule { uv_below: 1.5, cloud_above: 80, tier: BrightnessTier::Dim },
    BrightnessRule { uv_below: 3.0, cloud_above: 60, tier: BrightnessTier::Overcast },
    BrightnessRule { uv_below: 5.0, cloud_above: 40, tier: BrightnessTier::Hazy },
];

const BRIGHTNESS_FALLBACK: BrightnessTier = BrightnessTier::Bright;

/// Ceiling table rows: `(cloud cover strictly above, ceiling in metres)`.
/// Evaluated top to bottom, first match wins.
const CEILING_RULES: &[(u8, u32)] = &[(75, 800), (50, 1500)];

const CEILING_FALLBACK_M: u32 = 2500;

/// `clamp(t/6 - c/25, 0.5, 11)`.
pub fn uv_estimate(temperature_c: f64, cloud_cover_pct: u8) -> f64 {
    let raw = temperature_c / 6.0 - f64::from(cloud_cover_pct) / 25.0;
    if raw.is_nan() {
        return UV_MIN;
    }
    raw.clamp(UV_MIN, UV_MAX)
}

pub fn brightness_tier(uv: f64, cloud_cover_pct: u8) -> BrightnessTier {
    BRIGHTNESS_RULES
        .iter()
        .find(|rule| uv < rule.uv_below && cloud_cover_pct > rule.cloud_above)
        .map_or(BRIGHTNESS_FALLBACK, |rule| rule.tier)
}

pub fn cloud_ceiling_m(cloud_cover_pct: u8) -> u32 {
    CEILING_RULES
        .iter()
        .find(|(above, _)| cloud_cover_pct > *above)
        .map_or(CEILING_FALLBACK_M, |(_, ceiling)| *ceiling)
}

pub fn visibility_km(visibility_m: u32) -> f64 {
    f64::from(visibility_m) / 1000.0
}

/// Hourly volume in mm: non-zero rain, else snow, else zero.
pub fn precipitation_mm(rain_1h: Option<f64>, snow_1h: Option<f64>) -> f64 {
    rain_1h.filter(|rain| *rain != 0.0).or(snow_1h).unwrap_or(0.0)
}

pub fn derive(current: &CurrentConditions) -> DerivedMetrics {
    let uv = uv_estimate(current.temperature_c, current.cloud_cover_pct);
    DerivedMetrics {
        uv_estimate: uv,
        brightness_tier: brightness_tier(uv, current.cloud_cover_pct),
        cloud_ceiling_m: cloud_ceiling_m(current.cloud_cover_pct),
        visibility_km: visibility_km(current.visibility_m),
    }
}
