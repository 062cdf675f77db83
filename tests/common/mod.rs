//! Scripted providers and fixtures shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use trip_planner::models::{Attribution, DailyForecast, DateWindow, Event, Place, PointOfInterest};
use trip_planner::providers::{
    EventProvider, ForecastProvider, Geocoder, PoiProvider, TextPolisher, UpstreamError,
};
use trip_planner::{Capability, Providers, TripPlanner, TripPlannerConfig};

/// Replies with `result`, after failing transiently `fail_first` times
pub struct Scripted<T> {
    result: Result<T, UpstreamError>,
    fail_first: usize,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl<T: Clone> Scripted<T> {
    pub fn ok(value: T) -> Self {
        Self {
            result: Ok(value),
            fail_first: 0,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn err(error: UpstreamError) -> Self {
        Self {
            result: Err(error),
            fail_first: 0,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_first(mut self, attempts: usize) -> Self {
        self.fail_first = attempts;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn reply(&self) -> Result<T, UpstreamError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if call < self.fail_first {
            return Err(UpstreamError::Transient(format!("scripted failure {call}")));
        }
        self.result.clone()
    }
}

fn fake_attribution(provider: &str, used_for: &str) -> Attribution {
    Attribution::new(provider, "https://fake.example", used_for)
}

pub type FakeGeocoder = Scripted<Vec<Place>>;
pub type FakeForecast = Scripted<Vec<DailyForecast>>;
pub type FakePois = Scripted<Vec<PointOfInterest>>;

#[async_trait]
impl Geocoder for Scripted<Vec<Place>> {
    async fn resolve(&self, _name: &str) -> Result<Vec<Place>, UpstreamError> {
        self.reply().await
    }

    fn attribution(&self) -> Attribution {
        fake_attribution("FakeMeteo", "geocoding")
    }
}

#[async_trait]
impl ForecastProvider for Scripted<Vec<DailyForecast>> {
    async fn forecast(&self, _place: &Place, _days: u32) -> Result<Vec<DailyForecast>, UpstreamError> {
        self.reply().await
    }

    fn attribution(&self) -> Attribution {
        fake_attribution("FakeMeteo", "forecast")
    }
}

#[async_trait]
impl PoiProvider for Scripted<Vec<PointOfInterest>> {
    async fn search(
        &self,
        _latitude: f64,
        _longitude: f64,
        _radius_m: u32,
        _limit: usize,
    ) -> Result<Vec<PointOfInterest>, UpstreamError> {
        self.reply().await
    }

    fn attribution(&self) -> Attribution {
        fake_attribution("FakeWiki", "points of interest")
    }
}

/// Event provider that also records the searched window
pub struct FakeEvents {
    pub script: Scripted<Vec<Event>>,
    pub windows: Mutex<Vec<DateWindow>>,
}

impl FakeEvents {
    pub fn ok(events: Vec<Event>) -> Self {
        Self {
            script: Scripted::ok(events),
            windows: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.script.calls()
    }
}

#[async_trait]
impl EventProvider for FakeEvents {
    async fn search(
        &self,
        _latitude: f64,
        _longitude: f64,
        window: DateWindow,
    ) -> Result<Vec<Event>, UpstreamError> {
        self.windows.lock().unwrap().push(window);
        self.script.reply().await
    }

    fn attribution(&self) -> Attribution {
        fake_attribution("FakeTickets", "events")
    }
}

/// Polisher that swaps a word so rewrites are detectable
pub struct FakePolisher {
    pub calls: AtomicUsize,
    delay: Option<Duration>,
}

impl FakePolisher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextPolisher for FakePolisher {
    async fn polish(&self, text: &str) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(text.replace("Explore:", "Discover"))
    }

    fn attribution(&self) -> Attribution {
        fake_attribution("FakeLLM", "narrative polish")
    }
}

/// Handles to the fakes behind a planner
pub struct Harness {
    pub geocoder: Arc<FakeGeocoder>,
    pub forecast: Arc<FakeForecast>,
    pub pois: Arc<FakePois>,
    pub events: Option<Arc<FakeEvents>>,
    /// Whether `events` is handed to the planner or held back as unconfigured
    pub events_configured: bool,
    pub polisher: Option<Arc<FakePolisher>>,
}

impl Harness {
    pub fn new(geocoder: FakeGeocoder, forecast: FakeForecast, pois: FakePois) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            forecast: Arc::new(forecast),
            pois: Arc::new(pois),
            events: None,
            events_configured: false,
            polisher: None,
        }
    }

    /// Tokyo with five dry, hot days and eight sights
    pub fn tokyo() -> Self {
        Self::new(
            Scripted::ok(vec![tokyo()]),
            Scripted::ok(dry_hot_days(start_date(), 5)),
            Scripted::ok(sights(8)),
        )
    }

    pub fn with_events(mut self, events: FakeEvents) -> Self {
        self.events = Some(Arc::new(events));
        self.events_configured = true;
        self
    }

    /// Keep an event provider around without a credential to enable it
    pub fn with_unconfigured_events(mut self, events: FakeEvents) -> Self {
        self.events = Some(Arc::new(events));
        self.events_configured = false;
        self
    }

    pub fn with_polisher(self) -> Self {
        self.with_polisher_instance(FakePolisher::new())
    }

    pub fn with_polisher_instance(mut self, polisher: FakePolisher) -> Self {
        self.polisher = Some(Arc::new(polisher));
        self
    }

    pub fn providers(&self) -> Providers {
        Providers {
            geocoder: self.geocoder.clone(),
            forecast: self.forecast.clone(),
            pois: self.pois.clone(),
            events: match &self.events {
                Some(events) if self.events_configured => {
                    Capability::Configured(events.clone() as Arc<dyn EventProvider>)
                }
                _ => Capability::Unconfigured,
            },
            polisher: match &self.polisher {
                Some(polisher) => Capability::Configured(polisher.clone() as Arc<dyn TextPolisher>),
                None => Capability::Unconfigured,
            },
        }
    }

    pub fn planner(&self) -> TripPlanner {
        TripPlanner::new(&fast_config(), self.providers())
    }

    pub fn planner_with(&self, config: &TripPlannerConfig) -> TripPlanner {
        TripPlanner::new(config, self.providers())
    }
}

/// Default configuration with millisecond backoff
pub fn fast_config() -> TripPlannerConfig {
    let mut config = TripPlannerConfig::default();
    config.http.max_attempts = 3;
    config.http.backoff_min_ms = 1;
    config.http.backoff_max_ms = 2;
    config
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
}

pub fn tokyo() -> Place {
    Place::new("Tokyo", 35.6895, 139.6917)
        .with_country("Japan")
        .with_timezone("Asia/Tokyo")
}

pub fn dry_hot_days(start: NaiveDate, days: u32) -> Vec<DailyForecast> {
    (0..days)
        .map(|offset| DailyForecast {
            date: start + chrono::Days::new(u64::from(offset)),
            day_temp_c: Some(29.0 + f64::from(offset)),
            night_temp_c: Some(24.0),
            condition: "Clear".to_string(),
            precipitation_mm: Some(0.0),
            estimated: false,
        })
        .collect()
}

pub fn sights(count: usize) -> Vec<PointOfInterest> {
    (0..count)
        .map(|i| PointOfInterest::new(format!("Sight {i}"), Some(0.3 * (i + 1) as f64)))
        .collect()
}
