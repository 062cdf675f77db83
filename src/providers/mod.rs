//! Third-party data providers
//!
//! Each upstream API is consumed through a narrow trait so the planner can
//! be driven by real HTTP clients or by test doubles:
//! - [`Geocoder`] and [`ForecastProvider`]: Open-Meteo
//! - [`PoiProvider`]: Wikipedia GeoSearch
//! - [`EventProvider`]: Ticketmaster Discovery (credential required)
//! - [`TextPolisher`]: OpenAI-compatible chat completions (credential required)

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::TripPlannerConfig;
use crate::models::{Attribution, DailyForecast, DateWindow, Event, Place, PointOfInterest};

pub mod error;
pub mod http;
pub mod open_meteo;
pub mod openai;
pub mod ticketmaster;
pub mod wikipedia;

pub use error::UpstreamError;
pub use open_meteo::OpenMeteoClient;
pub use openai::OpenAiPolisher;
pub use ticketmaster::TicketmasterClient;
pub use wikipedia::WikipediaClient;

/// Resolves free-text names to places, best match first
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<Vec<Place>, UpstreamError>;
    fn attribution(&self) -> Attribution;
}

/// Daily weather forecasts starting today at the place
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn forecast(&self, place: &Place, days: u32) -> Result<Vec<DailyForecast>, UpstreamError>;
    fn attribution(&self) -> Attribution;
}

/// Points of interest around a coordinate
#[async_trait]
pub trait PoiProvider: Send + Sync {
    async fn search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        limit: usize,
    ) -> Result<Vec<PointOfInterest>, UpstreamError>;
    fn attribution(&self) -> Attribution;
}

/// Local events in a date window
#[async_trait]
pub trait EventProvider: Send + Sync {
    async fn search(
        &self,
        latitude: f64,
        longitude: f64,
        window: DateWindow,
    ) -> Result<Vec<Event>, UpstreamError>;
    fn attribution(&self) -> Attribution;
}

/// Rewrites mechanical text into friendlier prose
#[async_trait]
pub trait TextPolisher: Send + Sync {
    async fn polish(&self, text: &str) -> Result<String, UpstreamError>;
    fn attribution(&self) -> Attribution;
}

/// A provider that is only usable with a credential
pub enum Capability<P> {
    Configured(P),
    Unconfigured,
}

impl<P> Capability<P> {
    /// Build the provider when a non-blank credential is present
    pub fn from_credential(credential: Option<&str>, build: impl FnOnce(&str) -> P) -> Self {
        match credential.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => Capability::Configured(build(key)),
            None => Capability::Unconfigured,
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self, Capability::Configured(_))
    }

    pub fn as_configured(&self) -> Option<&P> {
        match self {
            Capability::Configured(provider) => Some(provider),
            Capability::Unconfigured => None,
        }
    }
}

/// The full set of providers a planner talks to
pub struct Providers {
    pub geocoder: Arc<dyn Geocoder>,
    pub forecast: Arc<dyn ForecastProvider>,
    pub pois: Arc<dyn PoiProvider>,
    pub events: Capability<Arc<dyn EventProvider>>,
    pub polisher: Capability<Arc<dyn TextPolisher>>,
}

impl Providers {
    /// Wire up the HTTP providers described by the configuration
    pub fn from_config(config: &TripPlannerConfig) -> anyhow::Result<Self> {
        let client = http::build_client(&config.http)?;
        let open_meteo = Arc::new(OpenMeteoClient::new(client.clone(), &config.providers));

        let events = Capability::from_credential(
            config.providers.events.api_key.as_deref(),
            |key| -> Arc<dyn EventProvider> {
                Arc::new(TicketmasterClient::new(
                    client.clone(),
                    &config.providers.events,
                    key,
                ))
            },
        );
        let polisher = Capability::from_credential(
            config.providers.polish.api_key.as_deref(),
            |key| -> Arc<dyn TextPolisher> {
                Arc::new(OpenAiPolisher::new(client.clone(), &config.providers.polish, key))
            },
        );

        Ok(Self {
            geocoder: open_meteo.clone(),
            forecast: open_meteo,
            pois: Arc::new(WikipediaClient::new(
                client,
                &config.providers.wikipedia_url,
            )),
            events,
            polisher,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_requires_non_blank_credential() {
        let configured = Capability::from_credential(Some("key-123"), |key| key.len());
        assert!(configured.is_configured());
        assert_eq!(configured.as_configured(), Some(&7));

        let blank = Capability::from_credential(Some("   "), |key| key.len());
        assert!(!blank.is_configured());

        let missing: Capability<usize> = Capability::from_credential(None, |key| key.len());
        assert!(missing.as_configured().is_none());
    }

    #[test]
    fn test_providers_from_default_config() {
        let config = TripPlannerConfig::default();
        let providers = Providers::from_config(&config).unwrap();
        assert!(!providers.events.is_configured());
        assert!(!providers.polisher.is_configured());
        assert_eq!(providers.geocoder.attribution().provider, "Open-Meteo");
    }

    #[test]
    fn test_providers_with_credentials() {
        let mut config = TripPlannerConfig::default();
        config.providers.events.api_key = Some("tm-key".to_string());
        config.providers.polish.api_key = Some("sk-test".to_string());
        let providers = Providers::from_config(&config).unwrap();
        assert!(providers.events.is_configured());
        assert!(providers.polisher.is_configured());
    }
}
