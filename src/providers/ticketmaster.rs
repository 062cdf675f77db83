//! Ticketmaster Discovery client for local events

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, instrument};

use super::http::send_json;
use super::{EventProvider, UpstreamError};
use crate::config::EventsConfig;
use crate::models::{Attribution, DateWindow, Event};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub struct TicketmasterClient {
    client: ClientWithMiddleware,
    url: String,
    api_key: String,
    radius_km: u32,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    #[serde(rename = "_embedded", default)]
    embedded: Option<EmbeddedEvents>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedEvents {
    #[serde(default)]
    events: Vec<TmEvent>,
}

#[derive(Debug, Deserialize)]
struct TmEvent {
    name: String,
    url: Option<String>,
    #[serde(default)]
    dates: Option<TmDates>,
    #[serde(rename = "_embedded", default)]
    embedded: Option<TmEventEmbedded>,
}

#[derive(Debug, Deserialize)]
struct TmDates {
    start: Option<TmStart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TmStart {
    local_date: Option<String>,
    date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmEventEmbedded {
    #[serde(default)]
    venues: Vec<TmVenue>,
}

#[derive(Debug, Deserialize)]
struct TmVenue {
    name: Option<String>,
}

impl TmStart {
    fn date(&self) -> Option<NaiveDate> {
        if let Some(local) = &self.local_date {
            if let Ok(date) = NaiveDate::parse_from_str(local, "%Y-%m-%d") {
                return Some(date);
            }
        }
        self.date_time
            .as_deref()
            .and_then(|dt| DateTime::parse_from_rfc3339(dt).ok())
            .map(|dt| dt.date_naive())
    }
}

impl From<TmEvent> for Event {
    fn from(event: TmEvent) -> Self {
        Event {
            name: event.name,
            date: event
                .dates
                .and_then(|d| d.start)
                .and_then(|start| start.date()),
            venue: event
                .embedded
                .and_then(|e| e.venues.into_iter().next())
                .and_then(|v| v.name),
            url: event.url,
        }
    }
}

impl TicketmasterClient {
    pub fn new(client: ClientWithMiddleware, config: &EventsConfig, api_key: &str) -> Self {
        Self {
            client,
            url: config.url.clone(),
            api_key: api_key.to_string(),
            radius_km: config.radius_km,
            page_size: config.page_size,
        }
    }
}

#[async_trait]
impl EventProvider for TicketmasterClient {
    #[instrument(skip(self))]
    async fn search(
        &self,
        latitude: f64,
        longitude: f64,
        window: DateWindow,
    ) -> Result<Vec<Event>, UpstreamError> {
        let url = format!(
            "{}?apikey={}&latlong={}&radius={}&unit=km&locale=*&startDateTime={}&endDateTime={}&size={}&sort=date,asc",
            self.url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&format!("{latitude},{longitude}")),
            self.radius_km,
            urlencoding::encode(&window.start_utc().format(DATE_TIME_FORMAT).to_string()),
            urlencoding::encode(&window.end_utc().format(DATE_TIME_FORMAT).to_string()),
            self.page_size
        );

        let response: DiscoveryResponse = send_json(self.client.get(&url), "Ticketmaster").await?;
        let events: Vec<Event> = response
            .embedded
            .map(|e| e.events)
            .unwrap_or_default()
            .into_iter()
            .map(Event::from)
            .collect();

        info!("Found {} events from Ticketmaster", events.len());
        Ok(events)
    }

    fn attribution(&self) -> Attribution {
        Attribution::new("Ticketmaster", "https://www.ticketmaster.com", "events")
    }
}
