//! Optional narrative polish of the summary and itinerary days
//!
//! Each day travels to the polisher as four prefixed lines:
//!
//! ```text
//! morning: Explore: Senso-ji
//! afternoon: Visit: Tokyo Tower
//! evening: Stroll: Ueno Park
//! meals: Local bakery breakfast; Regional specialty lunch; Well-reviewed dinner spot
//! ```
//!
//! and only comes back into the plan when the reply parses into the same
//! shape. Errors and timeouts keep the original text.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::ItineraryDay;
use crate::providers::{Capability, TextPolisher};
use crate::retry::{RetryPolicy, with_retry};

const MEAL_SEPARATOR: &str = "; ";

/// Result of a polish pass
#[derive(Debug, Clone, PartialEq)]
pub struct Polished {
    pub summary: String,
    pub days: Vec<ItineraryDay>,
    /// Whether any text was replaced
    pub polished: bool,
}

impl Polished {
    fn unchanged(summary: String, days: Vec<ItineraryDay>) -> Self {
        Self {
            summary,
            days,
            polished: false,
        }
    }
}

/// Polish the summary and every day concurrently within `limit`; never fails
pub async fn polish_plan(
    polisher: &Capability<Arc<dyn TextPolisher>>,
    policy: &RetryPolicy,
    limit: Duration,
    summary: String,
    days: Vec<ItineraryDay>,
) -> Polished {
    let Some(polisher) = polisher.as_configured() else {
        debug!("No polish credential configured, keeping mechanical text");
        return Polished::unchanged(summary, days);
    };
    let polisher: &dyn TextPolisher = polisher.as_ref();

    let summary_call = polish_text(polisher, policy, &summary);
    let day_calls = join_all(days.iter().map(|day| {
        let text = render_day(day);
        async move { polish_text(polisher, policy, &text).await }
    }));
    let replies = tokio::time::timeout(limit, async { tokio::join!(summary_call, day_calls) }).await;
    let Ok((summary_reply, day_replies)) = replies else {
        warn!("Polish timed out after {:?}, keeping original text", limit);
        return Polished::unchanged(summary, days);
    };

    let mut polished = false;
    let summary = match summary_reply {
        Some(reply) if reply != summary => {
            polished = true;
            reply
        }
        _ => summary,
    };

    let days: Vec<ItineraryDay> = days
        .into_iter()
        .zip(day_replies)
        .map(|(day, reply)| match reply.and_then(|reply| parse_day(&reply, &day)) {
            Some(rewritten) if rewritten != day => {
                polished = true;
                rewritten
            }
            _ => day,
        })
        .collect();

    Polished {
        summary,
        days,
        polished,
    }
}

async fn polish_text(polisher: &dyn TextPolisher, policy: &RetryPolicy, text: &str) -> Option<String> {
    with_retry(policy, "polish", move || async move { polisher.polish(text).await })
        .await
        .map_err(|err| warn!("Polish failed, keeping original text: {}", err))
        .ok()
}

/// Render a day as prefixed lines for the polisher
#[must_use]
pub fn render_day(day: &ItineraryDay) -> String {
    format!(
        "morning: {}\nafternoon: {}\nevening: {}\nmeals: {}",
        day.morning,
        day.afternoon,
        day.evening,
        day.meals.join(MEAL_SEPARATOR)
    )
}

/// Parse a polished reply back into `original`'s day, `None` if any slot is missing
#[must_use]
pub fn parse_day(reply: &str, original: &ItineraryDay) -> Option<ItineraryDay> {
    let (mut morning, mut afternoon, mut evening, mut meals) = (None, None, None, None);

    for line in reply.lines() {
        let Some((prefix, value)) = line.trim().split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match prefix.trim().to_lowercase().as_str() {
            "morning" => morning = Some(value.to_string()),
            "afternoon" => afternoon = Some(value.to_string()),
            "evening" => evening = Some(value.to_string()),
            "meals" => {
                let items: Vec<String> = value
                    .split(';')
                    .map(str::trim)
                    .filter(|meal| !meal.is_empty())
                    .map(str::to_string)
                    .collect();
                if !items.is_empty() {
                    meals = Some(items);
                }
            }
            _ => {}
        }
    }

    Some(ItineraryDay {
        day: original.day,
        date: original.date,
        morning: morning?,
        afternoon: afternoon?,
        evening: evening?,
        meals: meals?,
    })
}
