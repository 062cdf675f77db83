//! Per-source fetch policies: retry every call, then degrade enrichment failures

use chrono::{Days, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::TripConfig;
use crate::models::{DailyForecast, DateWindow, Event, Place, PointOfInterest};
use crate::providers::{Capability, EventProvider, ForecastProvider, Geocoder, PoiProvider, UpstreamError};
use crate::retry::{RetryPolicy, with_retry};
use crate::{Result, TripPlannerError};

/// Resolve the destination to its best match. The only fatal fetch.
pub async fn resolve_destination(
    geocoder: &dyn Geocoder,
    policy: &RetryPolicy,
    destination: &str,
) -> Result<Place> {
    let candidates = with_retry(policy, "geocode", move || async move {
        geocoder.resolve(destination).await
    })
    .await
    .map_err(|err| match err {
        UpstreamError::NotFound(_) => TripPlannerError::not_found(destination),
        other => TripPlannerError::upstream(format!("geocoding failed: {other}")),
    })?;

    let place = candidates
        .into_iter()
        .next()
        .ok_or_else(|| TripPlannerError::not_found(destination))?;

    info!(
        "Resolved '{}' to {} ({})",
        destination,
        place.label(),
        place.format_coordinates()
    );
    Ok(place)
}

/// Exactly `days` forecasts starting at `start_date`, never failing
pub async fn fetch_forecast(
    provider: &dyn ForecastProvider,
    policy: &RetryPolicy,
    place: &Place,
    start_date: NaiveDate,
    days: u32,
    lead_days: u32,
) -> Vec<DailyForecast> {
    let horizon = days.saturating_add(lead_days);
    let provided = with_retry(policy, "forecast", move || async move {
        provider.forecast(place, horizon).await
    })
    .await
    .unwrap_or_else(|err| {
        warn!("Forecast unavailable for {}, using placeholders: {}", place.label(), err);
        Vec::new()
    });

    align_forecast(provided, start_date, days)
}

/// Map provider days onto trip days by date.
///
/// Trip days the provider did not cover repeat the closest earlier known day
/// (or the earliest one when nothing earlier exists) and are marked
/// estimated. Without any provider data every day is an `Unknown` placeholder.
#[must_use]
pub fn align_forecast(mut provided: Vec<DailyForecast>, start_date: NaiveDate, days: u32) -> Vec<DailyForecast> {
    provided.sort_by_key(|day| day.date);

    trip_dates(start_date, days)
        .map(|date| {
            if let Some(exact) = provided.iter().find(|day| day.date == date) {
                return exact.clone();
            }
            let last_known = provided
                .iter()
                .rev()
                .find(|day| day.date < date)
                .or_else(|| provided.first());
            match last_known {
                Some(known) => known.estimated_for(date),
                None => DailyForecast::unknown(date),
            }
        })
        .collect()
}

/// Nearby sights sorted and trimmed to the configured budget, empty on failure
pub async fn fetch_pois(
    provider: &dyn PoiProvider,
    policy: &RetryPolicy,
    place: &Place,
    trip: &TripConfig,
) -> Vec<PointOfInterest> {
    let (radius_m, limit) = (trip.poi_radius_m, trip.poi_limit);
    let pois = with_retry(policy, "points of interest", move || async move {
        provider
            .search(place.latitude, place.longitude, radius_m, limit)
            .await
    })
    .await
    .unwrap_or_else(|err| {
        warn!("Sights unavailable for {}: {}", place.label(), err);
        Vec::new()
    });

    normalize_pois(pois, trip.poi_limit, trip.summary_chars)
}

/// Ascending distance (unknown distances last, ties by name), capped, summaries truncated
#[must_use]
pub fn normalize_pois(mut pois: Vec<PointOfInterest>, limit: usize, summary_chars: usize) -> Vec<PointOfInterest> {
    pois.sort_by(|a, b| {
        let by_distance = match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        by_distance.then_with(|| a.name.cmp(&b.name))
    });
    pois.truncate(limit);

    for poi in &mut pois {
        if let Some(summary) = &poi.summary {
            if summary.chars().count() > summary_chars {
                poi.summary = Some(summary.chars().take(summary_chars).collect());
            }
        }
    }
    pois
}

/// Events in the trip window; empty without a credential or on failure.
///
/// Events the provider dates outside the window's local days are dropped.
pub async fn fetch_events(
    provider: &Capability<Arc<dyn EventProvider>>,
    policy: &RetryPolicy,
    place: &Place,
    window: DateWindow,
) -> Vec<Event> {
    let Some(provider) = provider.as_configured() else {
        debug!("No events credential configured, skipping event search");
        return Vec::new();
    };
    let provider: &dyn EventProvider = provider.as_ref();

    let events = with_retry(policy, "events", move || async move {
        provider.search(place.latitude, place.longitude, window).await
    })
    .await
    .unwrap_or_else(|err| {
        warn!("Events unavailable for {}: {}", place.label(), err);
        Vec::new()
    });

    let found = events.len();
    let events: Vec<Event> = events
        .into_iter()
        .filter(|event| event.date.is_none_or(|date| window.contains(date)))
        .collect();
    if events.len() < found {
        debug!("Dropped {} events dated outside the trip", found - events.len());
    }
    events
}

pub(crate) fn trip_dates(start_date: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..u64::from(days)).map(move |offset| {
        start_date
            .checked_add_days(Days::new(offset))
            .unwrap_or(start_date)
    })
}
