use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use trip_planner::{TripPlanner, TripPlannerConfig, VERSION, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = TripPlannerConfig::load().context("Failed to load configuration")?;
    let guard = telemetry::init(&config.logging)?;

    let planner = TripPlanner::from_config(&config).context("Failed to build trip planner")?;
    info!(
        "Trip planner {} starting (events: {}, polish: {})",
        VERSION,
        planner.providers().events.is_configured(),
        planner.providers().polisher.is_configured()
    );

    let result = web::run(&config.server, Arc::new(planner)).await;
    guard.shutdown();
    result
}
