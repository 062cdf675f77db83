//! Local event model

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A ticketed event near the destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    /// Local date of the event, when the provider reports one
    pub date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub url: Option<String>,
}

/// Inclusive range of local trip dates searched for events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Timezone the dates are local to
    pub timezone: Tz,
}

impl DateWindow {
    /// Window covering `days` trip days starting at `start`, in UTC
    #[must_use]
    pub fn for_trip(start: NaiveDate, days: u32) -> Self {
        let end = start
            .checked_add_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(start);
        Self {
            start,
            end,
            timezone: Tz::UTC,
        }
    }

    /// Same dates, read as local to `timezone`
    #[must_use]
    pub fn in_timezone(self, timezone: Tz) -> Self {
        Self { timezone, ..self }
    }

    /// Local midnight at the start of the window, as UTC
    #[must_use]
    pub fn start_utc(&self) -> DateTime<Utc> {
        let local = self.start.and_time(NaiveTime::MIN);
        self.timezone
            .from_local_datetime(&local)
            .earliest()
            .map_or_else(|| local.and_utc(), |start| start.with_timezone(&Utc))
    }

    /// Last local second of the window's final day, as UTC
    #[must_use]
    pub fn end_utc(&self) -> DateTime<Utc> {
        let local = self
            .end
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.end.and_time(NaiveTime::MIN));
        self.timezone
            .from_local_datetime(&local)
            .latest()
            .map_or_else(|| local.and_utc(), |end| end.with_timezone(&Utc))
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    #[test]
    fn test_window_for_trip() {
        let start = NaiveDate::from_ymd_opt(2026, 12, 30).unwrap();
        let window = DateWindow::for_trip(start, 4);
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2027, 1, 2).unwrap());
        assert!(window.contains(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2027, 1, 3).unwrap()));
        assert_eq!(window.end_utc().format(FORMAT).to_string(), "2027-01-02T23:59:59Z");
    }

    #[test]
    fn test_single_day_window() {
        let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let window = DateWindow::for_trip(start, 1);
        assert_eq!(window.start, window.end);
    }

    #[test]
    fn test_bounds_follow_local_days() {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let tokyo = DateWindow::for_trip(start, 5).in_timezone(chrono_tz::Asia::Tokyo);
        assert_eq!(tokyo.start_utc().format(FORMAT).to_string(), "2026-06-30T15:00:00Z");
        assert_eq!(tokyo.end_utc().format(FORMAT).to_string(), "2026-07-05T14:59:59Z");

        let new_york = DateWindow::for_trip(start, 1).in_timezone(chrono_tz::America::New_York);
        assert_eq!(new_york.start_utc().format(FORMAT).to_string(), "2026-07-01T04:00:00Z");
        assert_eq!(new_york.end_utc().format(FORMAT).to_string(), "2026-07-02T03:59:59Z");
    }
}
