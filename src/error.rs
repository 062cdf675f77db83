//! Error types and handling for the trip planner

use thiserror::Error;

/// Stable, client-facing error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    NotFound,
    UpstreamUnavailable,
    Config,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::Config => "config",
        }
    }
}

/// Main error type for trip planning
#[derive(Error, Debug)]
pub enum TripPlannerError {
    /// Bad destination or day count, rejected before any network call
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Geocoding produced no match
    #[error("Destination not found: {destination}")]
    NotFound { destination: String },

    /// A required provider failed after the retry budget was spent
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl TripPlannerError {
    /// Create a new invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new not found error
    pub fn not_found<S: Into<String>>(destination: S) -> Self {
        Self::NotFound {
            destination: destination.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TripPlannerError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            TripPlannerError::NotFound { .. } => ErrorKind::NotFound,
            TripPlannerError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            TripPlannerError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripPlannerError::InvalidRequest { message } => format!("Invalid request: {message}"),
            TripPlannerError::NotFound { .. } => "Destination not found".to_string(),
            TripPlannerError::UpstreamUnavailable { .. } => {
                "Unable to reach travel data services. Please try again later.".to_string()
            }
            TripPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TripPlannerError::invalid_request("days must be positive");
        assert!(matches!(err, TripPlannerError::InvalidRequest { .. }));

        let err = TripPlannerError::not_found("Atlantis");
        assert!(matches!(err, TripPlannerError::NotFound { .. }));

        let err = TripPlannerError::upstream("geocoder down");
        assert!(matches!(err, TripPlannerError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(
            TripPlannerError::invalid_request("x").kind().as_str(),
            "invalid_request"
        );
        assert_eq!(TripPlannerError::not_found("x").kind().as_str(), "not_found");
        assert_eq!(
            TripPlannerError::upstream("x").kind().as_str(),
            "upstream_unavailable"
        );
    }

    #[test]
    fn test_user_messages() {
        let err = TripPlannerError::invalid_request("days out of range");
        assert!(err.user_message().contains("days out of range"));

        let err = TripPlannerError::upstream("connection reset");
        assert!(err.user_message().contains("Unable to reach"));
        assert!(!err.user_message().contains("connection reset"));
    }
}
