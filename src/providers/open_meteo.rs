//! Open-Meteo geocoding and daily forecast client (no API key required)

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use super::http::send_json;
use super::{ForecastProvider, Geocoder, UpstreamError};
use crate::config::ProvidersConfig;
use crate::models::{Attribution, DailyForecast, Place};

/// Open-Meteo serves at most 16 forecast days
pub const MAX_FORECAST_DAYS: u32 = 16;

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum";

#[derive(Clone)]
pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(client: ClientWithMiddleware, config: &ProvidersConfig) -> Self {
        Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        }
    }

    fn attribution_for(used_for: &str) -> Attribution {
        Attribution::new("Open-Meteo", "https://open-meteo.com", used_for)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn resolve(&self, name: &str) -> Result<Vec<Place>, UpstreamError> {
        let url = format!(
            "{}?name={}&count=5&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(name)
        );

        let response: openmeteo::GeocodingResponse =
            send_json(self.client.get(&url), "Open-Meteo geocoding").await?;

        let places: Vec<Place> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Place::from)
            .collect();

        if places.is_empty() {
            warn!("No results found for location '{}'", name);
        } else {
            debug!(
                "Geocoding results: {:?}",
                places
                    .iter()
                    .map(|p| format!("{} ({})", p.label(), p.format_coordinates()))
                    .collect::<Vec<_>>()
            );
        }

        Ok(places)
    }

    fn attribution(&self) -> Attribution {
        Self::attribution_for("geocoding")
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self, place), fields(place = %place.label()))]
    async fn forecast(&self, place: &Place, days: u32) -> Result<Vec<DailyForecast>, UpstreamError> {
        let url = format!(
            "{}?latitude={}&longitude={}&daily={}&timezone={}&forecast_days={}",
            self.forecast_url,
            place.latitude,
            place.longitude,
            DAILY_FIELDS,
            urlencoding::encode(&place.timezone),
            days.clamp(1, MAX_FORECAST_DAYS)
        );

        let response: openmeteo::ForecastResponse =
            send_json(self.client.get(&url), "Open-Meteo forecast").await?;

        let daily = response
            .daily
            .ok_or_else(|| UpstreamError::InvalidResponse("forecast without daily data".into()))?;
        let forecast = daily.into_forecasts();

        info!("Retrieved {} forecast days for {}", forecast.len(), place.label());
        Ok(forecast)
    }

    fn attribution(&self) -> Attribution {
        Self::attribution_for("forecast")
    }
}

/// Convert an Open-Meteo weather code to a short condition label
#[must_use]
pub fn weather_code_to_condition(code: u8) -> &'static str {
    match code {
        0 => "Clear",
        1..=3 => "Partly cloudy",
        45 | 48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 => "Rain",
        71..=77 => "Snow",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95..=99 => "Thunderstorm",
        _ => "Mixed",
    }
}

/// `OpenMeteo` API response structures and conversion utilities
mod openmeteo {
    use super::{DailyForecast, NaiveDate, Place, weather_code_to_condition};
    use serde::Deserialize;

    /// Daily forecast response from `OpenMeteo` API
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub daily: Option<DailyData>,
    }

    /// Daily weather data from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max", default)]
        pub temperature_max: Vec<Option<f64>>,
        #[serde(rename = "temperature_2m_min", default)]
        pub temperature_min: Vec<Option<f64>>,
        #[serde(rename = "precipitation_sum", default)]
        pub precipitation: Vec<Option<f64>>,
        #[serde(rename = "weathercode", default)]
        pub weather_code: Vec<Option<u8>>,
    }

    impl DailyData {
        /// Zip the column arrays into per-day forecasts, skipping unparseable dates
        pub fn into_forecasts(self) -> Vec<DailyForecast> {
            self.time
                .iter()
                .enumerate()
                .filter_map(|(i, time)| {
                    let date = NaiveDate::parse_from_str(time, "%Y-%m-%d").ok()?;
                    let condition = self
                        .weather_code
                        .get(i)
                        .copied()
                        .flatten()
                        .map_or("Mixed", weather_code_to_condition);

                    Some(DailyForecast {
                        date,
                        day_temp_c: self.temperature_max.get(i).copied().flatten(),
                        night_temp_c: self.temperature_min.get(i).copied().flatten(),
                        condition: condition.to_string(),
                        precipitation_mm: self.precipitation.get(i).copied().flatten(),
                        estimated: false,
                    })
                })
                .collect()
        }
    }

    /// Geocoding response from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
        pub timezone: Option<String>,
    }

    impl From<GeocodingResult> for Place {
        fn from(result: GeocodingResult) -> Self {
            Place {
                name: result.name,
                country: result.country,
                latitude: result.latitude,
                longitude: result.longitude,
                timezone: result
                    .timezone
                    .filter(|tz| !tz.is_empty())
                    .unwrap_or_else(|| "UTC".to_string()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_daily_data_conversion() {
            let json = r#"{
                "daily": {
                    "time": ["2026-07-01", "2026-07-02", "garbage"],
                    "temperature_2m_max": [33.1, null, 20.0],
                    "temperature_2m_min": [24.9, 23.0, 12.0],
                    "precipitation_sum": [0.0, 4.2, 0.0],
                    "weathercode": [1, 63, 0]
                }
            }"#;
            let response: ForecastResponse = serde_json::from_str(json).unwrap();
            let days = response.daily.unwrap().into_forecasts();

            assert_eq!(days.len(), 2);
            assert_eq!(days[0].condition, "Partly cloudy");
            assert_eq!(days[0].day_temp_c, Some(33.1));
            assert_eq!(days[1].day_temp_c, None);
            assert_eq!(days[1].condition, "Rain");
            assert_eq!(days[1].precipitation_mm, Some(4.2));
            assert!(!days[1].estimated);
        }

        #[test]
        fn test_geocoding_result_defaults_timezone() {
            let json = r#"{"results":[{"name":"Tokyo","latitude":35.6895,"longitude":139.69171,"country":"Japan"}]}"#;
            let response: GeocodingResponse = serde_json::from_str(json).unwrap();
            let place: Place = response.results.unwrap().remove(0).into();
            assert_eq!(place.label(), "Tokyo, Japan");
            assert_eq!(place.timezone, "UTC");
        }

        #[test]
        fn test_missing_results_field() {
            let response: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
            assert!(response.results.is_none());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "Clear")]
    #[case(2, "Partly cloudy")]
    #[case(48, "Fog")]
    #[case(55, "Drizzle")]
    #[case(65, "Rain")]
    #[case(75, "Snow")]
    #[case(81, "Rain showers")]
    #[case(86, "Snow showers")]
    #[case(99, "Thunderstorm")]
    #[case(42, "Mixed")]
    fn test_weather_code_to_condition(#[case] code: u8, #[case] expected: &str) {
        assert_eq!(weather_code_to_condition(code), expected);
    }
}
