//! Configuration management for the trip planner
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. The resulting
//! [`TripPlannerConfig`] is built once at startup and handed to the planner
//! by reference.

use crate::TripPlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TripPlannerConfig {
    pub server: ServerConfig,
    /// Outbound HTTP behaviour shared by all providers
    pub http: HttpConfig,
    pub providers: ProvidersConfig,
    /// Trip limits and POI search parameters
    pub trip: TripConfig,
    /// Packing list thresholds
    pub packing: PackingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
    /// Total attempts per outbound call, including the first one
    pub max_attempts: u32,
    /// Lower bound of the exponential backoff
    pub backoff_min_ms: u64,
    /// Upper bound of the exponential backoff
    pub backoff_max_ms: u64,
    /// Deadline for a whole planning run
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    /// Wikipedia action API endpoint
    pub wikipedia_url: String,
    pub events: EventsConfig,
    pub polish: PolishConfig,
}

/// Ticketmaster Discovery settings. Events are only fetched with an API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub api_key: Option<String>,
    pub url: String,
    pub radius_km: u32,
    pub page_size: u32,
}

/// Chat completion settings for narrative polishing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolishConfig {
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API, without `/chat/completions`
    pub url: String,
    pub model: String,
    pub temperature: f32,
    /// Budget for polishing a whole plan
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// Longest trip accepted, in days
    pub max_days: u32,
    pub poi_radius_m: u32,
    pub poi_limit: usize,
    /// Character budget for POI summaries
    pub summary_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    pub hot_threshold_c: f64,
    pub cold_threshold_c: f64,
    /// Trips whose total precipitation exceeds this pack rain gear
    pub rain_threshold_mm: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// OTLP/HTTP collector endpoint; spans are only exported when set
    pub otlp_endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            max_attempts: 3,
            backoff_min_ms: 500,
            backoff_max_ms: 4000,
            request_timeout_seconds: 45,
            user_agent: format!("TripPlanner/{}", crate::VERSION),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            wikipedia_url: "https://en.wikipedia.org/w/api.php".to_string(),
            events: EventsConfig::default(),
            polish: PolishConfig::default(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: "https://app.ticketmaster.com/discovery/v2/events.json".to_string(),
            radius_km: 25,
            page_size: 20,
        }
    }
}

impl Default for PolishConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_seconds: 20,
        }
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            max_days: 30,
            poi_radius_m: 3000,
            poi_limit: 8,
            summary_chars: 600,
        }
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            hot_threshold_c: 28.0,
            cold_threshold_c: 10.0,
            rain_threshold_mm: 0.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl TripPlannerConfig {
    /// Load configuration from the default file location and environment variables
    pub fn load() -> Result<Self> {
        let path = env::var("TRIPPLANNER_CONFIG").ok().map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPPLANNER_HTTP__TIMEOUT_SECONDS -> http.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("TRIPPLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripPlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_credential_env();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trip-planner").join("config.toml"))
    }

    /// Fill missing credentials from the conventional provider variables
    fn apply_credential_env(&mut self) {
        let from_env = |name: &str| env::var(name).ok().filter(|key| !key.trim().is_empty());

        if self.providers.events.api_key.is_none() {
            self.providers.events.api_key = from_env("TICKETMASTER_API_KEY");
        }
        if self.providers.polish.api_key.is_none() {
            self.providers.polish.api_key = from_env("OPENAI_API_KEY");
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("Events", &self.providers.events.api_key),
            ("Polish", &self.providers.polish.api_key),
        ];

        for (provider, key) in keys {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(TripPlannerError::config(format!(
                        "{provider} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 || self.http.timeout_seconds > 300 {
            return Err(
                TripPlannerError::config("HTTP timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.http.max_attempts == 0 || self.http.max_attempts > 10 {
            return Err(TripPlannerError::config("HTTP max attempts must be between 1 and 10").into());
        }

        if self.http.backoff_min_ms > self.http.backoff_max_ms {
            return Err(TripPlannerError::config(
                "Backoff minimum cannot exceed the backoff maximum",
            )
            .into());
        }

        if self.http.request_timeout_seconds == 0 {
            return Err(TripPlannerError::config("Request timeout must be positive").into());
        }

        if self.providers.polish.timeout_seconds > self.http.request_timeout_seconds {
            return Err(TripPlannerError::config(
                "Polish timeout cannot exceed the request timeout",
            )
            .into());
        }

        if self.trip.max_days == 0 || self.trip.max_days > 60 {
            return Err(TripPlannerError::config("Maximum trip length must be between 1 and 60 days").into());
        }

        // Wikipedia GeoSearch caps the radius at 10 km
        if self.trip.poi_radius_m == 0 || self.trip.poi_radius_m > 10_000 {
            return Err(
                TripPlannerError::config("POI radius must be between 1 and 10000 meters").into(),
            );
        }

        if self.trip.poi_limit == 0 || self.trip.poi_limit > 50 {
            return Err(TripPlannerError::config("POI limit must be between 1 and 50").into());
        }

        if self.packing.cold_threshold_c >= self.packing.hot_threshold_c {
            return Err(TripPlannerError::config(
                "Cold threshold must be below the hot threshold",
            )
            .into());
        }

        if self.packing.rain_threshold_mm < 0.0 {
            return Err(TripPlannerError::config("Rain threshold cannot be negative").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripPlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripPlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Geocoding", &self.providers.geocoding_url),
            ("Forecast", &self.providers.forecast_url),
            ("Wikipedia", &self.providers.wikipedia_url),
            ("Events", &self.providers.events.url),
            ("Polish", &self.providers.polish.url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TripPlannerError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TripPlannerConfig::default();
        assert_eq!(config.http.timeout_seconds, 8);
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.trip.max_days, 30);
        assert_eq!(config.trip.poi_limit, 8);
        assert_eq!(config.logging.level, "info");
        assert!(config.providers.events.api_key.is_none());
        assert!(config.providers.polish.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = TripPlannerConfig::default();
        config.providers.events.api_key = Some("  ".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripPlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TripPlannerConfig::default();
        config.http.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP timeout"));

        let mut config = TripPlannerConfig::default();
        config.http.backoff_min_ms = 5000;
        assert!(config.validate().is_err());

        let mut config = TripPlannerConfig::default();
        config.packing.cold_threshold_c = 30.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_polish_timeout_fits_request_timeout() {
        let mut config = TripPlannerConfig::default();
        config.http.request_timeout_seconds = 10;
        config.providers.polish.timeout_seconds = 20;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Polish timeout"));

        config.providers.polish.timeout_seconds = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = TripPlannerConfig::default();
        config.providers.forecast_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Forecast URL"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[trip]
max_days = 14
poi_limit = 5

[providers.events]
api_key = "tm-test-key"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = TripPlannerConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.trip.max_days, 14);
        assert_eq!(config.trip.poi_limit, 5);
        assert_eq!(config.trip.poi_radius_m, 3000);
        assert_eq!(config.providers.events.api_key.as_deref(), Some("tm-test-key"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.http.max_attempts, 3);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TripPlannerConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("trip-planner"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
