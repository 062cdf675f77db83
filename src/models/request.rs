//! Inbound trip planning request

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::TripPlannerError;

const MAX_DESTINATION_CHARS: usize = 120;

/// "Plan a trip for destination X over N days"
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripRequest {
    pub destination: String,
    /// Signed so that negative values reach validation instead of failing decoding
    pub days: i64,
    /// First trip day; defaults to today at the destination
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTrip {
    pub destination: String,
    pub days: u32,
    pub start_date: Option<NaiveDate>,
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, days: i64) -> Self {
        Self {
            destination: destination.into(),
            days,
            start_date: None,
        }
    }

    #[must_use]
    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Check destination and day count against the configured maximum
    pub fn validate(&self, max_days: u32) -> crate::Result<ValidTrip> {
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(TripPlannerError::invalid_request("destination cannot be empty"));
        }
        if destination.chars().count() > MAX_DESTINATION_CHARS {
            return Err(TripPlannerError::invalid_request(format!(
                "destination cannot exceed {MAX_DESTINATION_CHARS} characters"
            )));
        }

        if self.days < 1 || self.days > i64::from(max_days) {
            return Err(TripPlannerError::invalid_request(format!(
                "days must be between 1 and {max_days}, got {}",
                self.days
            )));
        }

        Ok(ValidTrip {
            destination: destination.to_string(),
            days: u32::try_from(self.days).unwrap_or(max_days),
            start_date: self.start_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Tokyo", 1)]
    #[case("  Paris, France  ", 30)]
    #[case("X", 5)]
    fn test_valid_requests(#[case] destination: &str, #[case] days: i64) {
        let trip = TripRequest::new(destination, days).validate(30).unwrap();
        assert_eq!(trip.destination, destination.trim());
        assert_eq!(i64::from(trip.days), days);
    }

    #[rstest]
    #[case("", 3)]
    #[case("   ", 3)]
    #[case("Tokyo", 0)]
    #[case("Tokyo", -2)]
    #[case("Tokyo", 31)]
    fn test_invalid_requests(#[case] destination: &str, #[case] days: i64) {
        let err = TripRequest::new(destination, days).validate(30).unwrap_err();
        assert!(matches!(err, TripPlannerError::InvalidRequest { .. }));
    }

    #[test]
    fn test_overlong_destination() {
        let name = "a".repeat(121);
        assert!(TripRequest::new(name, 2).validate(30).is_err());
    }

    #[test]
    fn test_start_date_deserializes() {
        let request: TripRequest =
            serde_json::from_str(r#"{"destination":"Tokyo","days":5,"start_date":"2026-07-01"}"#)
                .unwrap();
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2026, 7, 1));

        let request: TripRequest =
            serde_json::from_str(r#"{"destination":"Tokyo","days":5}"#).unwrap();
        assert_eq!(request.start_date, None);
    }
}
