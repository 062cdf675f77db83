//! Trip planner - destination itineraries from free travel data
//!
//! This library geocodes a destination, gathers weather, nearby sights and
//! local events from third-party providers, and turns them into a day-by-day
//! itinerary with a weather-aware packing list.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod providers;
pub mod retry;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::TripPlannerConfig;
pub use error::{ErrorKind, TripPlannerError};
pub use models::{TripPlan, TripRequest};
pub use planner::TripPlanner;
pub use providers::{Capability, Providers};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripPlannerError>;
