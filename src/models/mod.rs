//! Data models for the trip planner
//!
//! This module contains the core domain models organized by concern:
//! - Place: the geocoded destination
//! - Forecast: daily weather summaries and their aggregate statistics
//! - Poi / Event: enrichment data gathered around the destination
//! - Plan: the derived itinerary, packing list and response root
//! - Request: the inbound "plan a trip" request

pub mod event;
pub mod forecast;
pub mod place;
pub mod plan;
pub mod poi;
pub mod request;

// Re-export all public types for convenient access
pub use event::{DateWindow, Event};
pub use forecast::{DailyForecast, ForecastStats};
pub use place::Place;
pub use plan::{Attribution, ItineraryDay, PackingList, TripContext, TripPlan};
pub use poi::PointOfInterest;
pub use request::TripRequest;
