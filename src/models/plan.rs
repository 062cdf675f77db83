//! Derived trip plan structures returned to clients

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DailyForecast, Event, Place, PointOfInterest};

/// One day of the itinerary
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItineraryDay {
    /// 1-based day counter
    pub day: u32,
    pub date: NaiveDate,
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
    pub meals: Vec<String>,
}

/// Categorized packing list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PackingList {
    pub essentials: Vec<String>,
    pub clothing: Vec<String>,
    pub toiletries: Vec<String>,
    pub electronics: Vec<String>,
    pub destination_specific: Vec<String>,
}

impl PackingList {
    /// Total number of items across all categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.essentials.len()
            + self.clothing.len()
            + self.toiletries.len()
            + self.electronics.len()
            + self.destination_specific.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Credit for a third-party data source
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Attribution {
    pub provider: String,
    pub url: String,
    /// What the provider contributed, e.g. "forecast"
    pub used_for: String,
}

impl Attribution {
    pub fn new(provider: &str, url: &str, used_for: &str) -> Self {
        Self {
            provider: provider.to_string(),
            url: url.to_string(),
            used_for: used_for.to_string(),
        }
    }
}

/// Raw data the plan was built from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripContext {
    pub geo: Place,
    pub forecast: Vec<DailyForecast>,
    pub pois: Vec<PointOfInterest>,
    pub events: Vec<Event>,
    pub attributions: Vec<Attribution>,
}

/// Response root for a planned trip
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripPlan {
    /// Destination label, e.g. "Tokyo, Japan"
    pub destination: String,
    pub days: u32,
    pub start_date: NaiveDate,
    pub summary: String,
    pub daily_itinerary: Vec<ItineraryDay>,
    pub packing_list: PackingList,
    /// Whether the narrative polisher rewrote any text
    pub polished: bool,
    pub context: TripContext,
}
