//! Trip planning orchestration
//!
//! [`TripPlanner::plan`] validates the request, geocodes the destination,
//! fans out to the forecast, sights and events providers, and derives the
//! itinerary, summary and packing list from whatever came back. Only the
//! destination lookup can fail a plan; every other source degrades to an
//! empty or placeholder value, including when it is still running at the
//! request deadline.

pub mod fetch;
pub mod itinerary;
pub mod packing;
pub mod polish;

use std::time::Duration;
use tokio::time::{Instant, timeout_at};
use tracing::{info, instrument, warn};

use crate::config::{PackingConfig, TripConfig, TripPlannerConfig};
use crate::models::{Attribution, DateWindow, ForecastStats, TripContext, TripPlan, TripRequest};
use crate::providers::Providers;
use crate::retry::RetryPolicy;
use crate::{Result, TripPlannerError};

pub use itinerary::{compose_itinerary, summarize};
pub use packing::build_packing_list;
pub use polish::{Polished, polish_plan};

/// Builds trip plans from the configured providers
pub struct TripPlanner {
    providers: Providers,
    retry: RetryPolicy,
    trip: TripConfig,
    packing: PackingConfig,
    request_timeout: Duration,
    polish_timeout: Duration,
}

impl TripPlanner {
    #[must_use]
    pub fn new(config: &TripPlannerConfig, providers: Providers) -> Self {
        Self {
            providers,
            retry: RetryPolicy::from_config(&config.http),
            trip: config.trip.clone(),
            packing: config.packing.clone(),
            request_timeout: config.http.request_timeout(),
            polish_timeout: Duration::from_secs(config.providers.polish.timeout_seconds),
        }
    }

    /// Planner backed by the HTTP providers described in `config`
    pub fn from_config(config: &TripPlannerConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config, Providers::from_config(config)?))
    }

    #[must_use]
    pub fn max_days(&self) -> u32 {
        self.trip.max_days
    }

    #[must_use]
    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    /// Plan a trip, bounded by the configured request timeout.
    ///
    /// Only a destination lookup still running at the deadline fails the
    /// plan. Enrichment cut off by the deadline falls back like any other
    /// enrichment failure, and polishing gets whatever time is left.
    #[instrument(skip(self, request), fields(destination = %request.destination, days = request.days))]
    pub async fn plan(&self, request: &TripRequest) -> Result<TripPlan> {
        let trip = request.validate(self.trip.max_days)?;
        let deadline = Instant::now() + self.request_timeout;
        let (destination, days) = (trip.destination.as_str(), trip.days);
        let providers = &self.providers;

        let place = timeout_at(
            deadline,
            fetch::resolve_destination(providers.geocoder.as_ref(), &self.retry, destination),
        )
        .await
        .unwrap_or_else(|_| {
            warn!("Resolving '{}' exceeded {:?}", destination, self.request_timeout);
            Err(TripPlannerError::upstream(format!(
                "destination lookup did not finish within {} seconds",
                self.request_timeout.as_secs()
            )))
        })?;

        let today = place.local_today();
        let start_date = trip.start_date.unwrap_or(today);
        let lead_days = u32::try_from((start_date - today).num_days().max(0)).unwrap_or(u32::MAX);
        let window = DateWindow::for_trip(start_date, days).in_timezone(place.tz());

        let (forecast, pois, events) = tokio::join!(
            until_deadline(
                deadline,
                "Forecast",
                fetch::fetch_forecast(
                    providers.forecast.as_ref(),
                    &self.retry,
                    &place,
                    start_date,
                    days,
                    lead_days
                ),
                || fetch::align_forecast(Vec::new(), start_date, days),
            ),
            until_deadline(
                deadline,
                "Sights",
                fetch::fetch_pois(providers.pois.as_ref(), &self.retry, &place, &self.trip),
                Vec::new,
            ),
            until_deadline(
                deadline,
                "Events",
                fetch::fetch_events(&providers.events, &self.retry, &place, window),
                Vec::new,
            ),
        );

        let itinerary = compose_itinerary(start_date, days, &pois, &events);
        let summary = summarize(&place, &forecast, &pois, &events);
        let packing_list = build_packing_list(&ForecastStats::from_days(&forecast), days, &self.packing);

        let remaining = deadline.saturating_duration_since(Instant::now());
        let polished = polish_plan(
            &providers.polisher,
            &self.retry,
            self.polish_timeout.min(remaining),
            summary,
            itinerary,
        )
        .await;

        let attributions = self.attributions(polished.polished);
        info!(
            "Planned {} days in {}: {} sights, {} events, polished: {}",
            days,
            place.label(),
            pois.len(),
            events.len(),
            polished.polished
        );

        Ok(TripPlan {
            destination: place.label(),
            days,
            start_date,
            summary: polished.summary,
            daily_itinerary: polished.days,
            packing_list,
            polished: polished.polished,
            context: TripContext {
                geo: place,
                forecast,
                pois,
                events,
                attributions,
            },
        })
    }

    /// Credits for every source consulted, one entry per provider
    fn attributions(&self, polished: bool) -> Vec<Attribution> {
        let providers = &self.providers;
        let mut all = vec![
            providers.geocoder.attribution(),
            providers.forecast.attribution(),
            providers.pois.attribution(),
        ];
        if let Some(events) = providers.events.as_configured() {
            all.push(events.attribution());
        }
        if polished {
            if let Some(polisher) = providers.polisher.as_configured() {
                all.push(polisher.attribution());
            }
        }

        let mut merged: Vec<Attribution> = Vec::with_capacity(all.len());
        for attribution in all {
            match merged.iter_mut().find(|seen| seen.provider == attribution.provider) {
                Some(seen) => {
                    seen.used_for = format!("{}, {}", seen.used_for, attribution.used_for);
                }
                None => merged.push(attribution),
            }
        }
        merged
    }
}

/// Run an enrichment step until `deadline`, then fall back without it
async fn until_deadline<T>(
    deadline: Instant,
    source: &str,
    step: impl Future<Output = T>,
    fallback: impl FnOnce() -> T,
) -> T {
    timeout_at(deadline, step).await.unwrap_or_else(|_| {
        warn!("{} still pending at the request deadline, continuing without it", source);
        fallback()
    })
}
