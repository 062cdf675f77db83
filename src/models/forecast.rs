//! Daily forecast model and aggregate statistics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Condition label for days without forecast data
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Weather summary for one trip day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Daytime maximum in Celsius
    pub day_temp_c: Option<f64>,
    /// Nighttime minimum in Celsius
    pub night_temp_c: Option<f64>,
    /// Human-readable condition, e.g. "Partly cloudy"
    pub condition: String,
    pub precipitation_mm: Option<f64>,
    /// True for padded days and placeholders that did not come from the provider
    pub estimated: bool,
}

impl DailyForecast {
    /// Placeholder used when no forecast is available for a day
    #[must_use]
    pub fn unknown(date: NaiveDate) -> Self {
        Self {
            date,
            day_temp_c: None,
            night_temp_c: None,
            condition: UNKNOWN_CONDITION.to_string(),
            precipitation_mm: None,
            estimated: true,
        }
    }

    /// Copy of this forecast moved to another date and marked as estimated
    #[must_use]
    pub fn estimated_for(&self, date: NaiveDate) -> Self {
        Self {
            date,
            estimated: true,
            ..self.clone()
        }
    }

    /// Whether the day carries any measurement
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.day_temp_c.is_some() || self.precipitation_mm.is_some()
    }

    /// Format the temperature range, e.g. "33/24°C"
    #[must_use]
    pub fn format_temperature(&self) -> Option<String> {
        match (self.day_temp_c, self.night_temp_c) {
            (Some(day), Some(night)) => Some(format!("{day:.0}/{night:.0}°C")),
            (Some(day), None) => Some(format!("{day:.0}°C")),
            _ => None,
        }
    }
}

/// Aggregate statistics over a trip's forecast
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForecastStats {
    /// Highest known daytime temperature
    pub max_day_temp_c: Option<f64>,
    /// Precipitation summed over the known days
    pub total_precipitation_mm: f64,
}

impl ForecastStats {
    /// Compute statistics, skipping days without measurements
    #[must_use]
    pub fn from_days(days: &[DailyForecast]) -> Self {
        let mut stats = Self::default();

        for day in days {
            if let Some(temp) = day.day_temp_c {
                stats.max_day_temp_c = Some(stats.max_day_temp_c.map_or(temp, |max| max.max(temp)));
            }
            if let Some(precipitation) = day.precipitation_mm {
                stats.total_precipitation_mm += precipitation;
            }
        }

        stats
    }

    /// Whether the trip's total precipitation exceeds `threshold_mm`
    #[must_use]
    pub fn rain_above(&self, threshold_mm: f64) -> bool {
        self.total_precipitation_mm > threshold_mm
    }
}
