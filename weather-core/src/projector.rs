//! Reshapes the provider's forecast sequence into the two dashboard views.

use crate::model::{ForecastPoint, ForecastProjection};

/// How the raw sequence is cut into views.
///
/// `spacing_hours` is the span each provider point is assumed to cover. The
/// extended window counts hours by adding this fixed step per point, so a
/// provider returning irregular spacing yields a window of the wrong length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionSettings {
    pub short_len: usize,
    pub spacing_hours: u32,
    pub horizon_hours: u32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self { short_len: 6, spacing_hours: 3, horizon_hours: 36 }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastProjector {
    settings: ProjectionSettings,
}

impl ForecastProjector {
    pub fn new(settings: ProjectionSettings) -> Self {
        Self { settings }
    }

    /// Near-term view: the first `short_len` points, unmodified.
    pub fn short_list(&self, points: &[ForecastPoint]) -> Vec<ForecastPoint> {
        points.iter().take(self.settings.short_len).cloned().collect()
    }

    /// Prefix window covering `horizon_hours`. The running total is tested
    /// before each point is taken and bumped after it.
    pub fn extended_list(&self, points: &[ForecastPoint]) -> Vec<ForecastPoint> {
        let mut window = Vec::new();
        let mut hours_counted: u32 = 0;
        for point in points {
            if hours_counted >= self.settings.horizon_hours {
                break;
            }
            window.push(point.clone());
            hours_counted = hours_counted.saturating_add(self.settings.spacing_hours);
        }
        window
    }

    pub fn project(&self, points: &[ForecastPoint]) -> ForecastProjection {
        ForecastProjection { short: self.short_list(points), extended: self.extended_list(points) }
    }
}
