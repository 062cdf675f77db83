//! Deterministic itinerary composition and trip summary
//!
//! Day `i` (0-based) draws its three slots from a window of three
//! consecutive POIs starting at `3i`, wrapping around the pool. With at
//! least three POIs the slots of one day are always distinct; smaller pools
//! fall back to generic activities instead of repeating a POI within a day.
//! An event dated on the day takes the evening slot.

use chrono::NaiveDate;

use super::fetch::trip_dates;
use crate::models::{DailyForecast, Event, ItineraryDay, Place, PointOfInterest};

pub const FALLBACK_MORNING: &str = "City walk";
pub const FALLBACK_AFTERNOON: &str = "Top landmark";
pub const FALLBACK_EVENING: &str = "Local food crawl";

pub const MEALS: [&str; 3] = [
    "Local bakery breakfast",
    "Regional specialty lunch",
    "Well-reviewed dinner spot",
];

/// Build one itinerary day per trip day
#[must_use]
pub fn compose_itinerary(
    start_date: NaiveDate,
    days: u32,
    pois: &[PointOfInterest],
    events: &[Event],
) -> Vec<ItineraryDay> {
    let mut used_events = vec![false; events.len()];

    trip_dates(start_date, days)
        .zip(0_usize..)
        .map(|(date, i)| {
            let slot = |offset: usize| &pois[(3 * i + offset) % pois.len()].name;

            let morning = if pois.is_empty() {
                FALLBACK_MORNING.to_string()
            } else {
                format!("Explore: {}", slot(0))
            };

            let afternoon = if pois.len() > 1 {
                format!("Visit: {}", slot(1))
            } else {
                FALLBACK_AFTERNOON.to_string()
            };

            let event = events
                .iter()
                .enumerate()
                .find(|(idx, event)| !used_events[*idx] && event.date == Some(date));
            let evening = match event {
                Some((idx, event)) => {
                    used_events[idx] = true;
                    match &event.venue {
                        Some(venue) => format!("Attend: {} @ {}", event.name, venue),
                        None => format!("Attend: {}", event.name),
                    }
                }
                None if pois.len() > 2 => format!("Stroll: {}", slot(2)),
                None => FALLBACK_EVENING.to_string(),
            };

            ItineraryDay {
                day: u32::try_from(i + 1).unwrap_or(u32::MAX),
                date,
                morning,
                afternoon,
                evening,
                meals: MEALS.iter().map(|meal| (*meal).to_string()).collect(),
            }
        })
        .collect()
}

/// One-sentence overview of the trip context
#[must_use]
pub fn summarize(
    place: &Place,
    forecast: &[DailyForecast],
    pois: &[PointOfInterest],
    events: &[Event],
) -> String {
    let weather = match forecast.first() {
        Some(first) if first.has_data() => {
            let temps = first
                .format_temperature()
                .map(|t| format!(", {t}"))
                .unwrap_or_default();
            let precipitation = first.precipitation_mm.unwrap_or(0.0);
            format!(
                "First day looks {}{} with {:.0}mm precip.",
                first.condition.to_lowercase(),
                temps,
                precipitation
            )
        }
        _ => "Weather not available.".to_string(),
    };

    format!(
        "{}: {} {} sights nearby, {} events found.",
        place.label(),
        weather,
        pois.len(),
        events.len()
    )
}
