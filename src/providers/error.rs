use reqwest_retry::Retryable;
use thiserror::Error;

/// Failure of a single provider call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Network trouble, timeouts, 5xx or 429; worth another attempt
    #[error("Transient upstream error: {0}")]
    Transient(String),

    /// The provider refused the request (4xx other than 404/408/429)
    #[error("Upstream rejected request: {0}")]
    Rejected(String),

    #[error("Upstream resource not found: {0}")]
    NotFound(String),

    /// The response body did not have the expected shape
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Build an error from a retry classification
    pub fn classified(retryable: Option<Retryable>, message: String) -> Self {
        match retryable {
            Some(Retryable::Transient) => UpstreamError::Transient(message),
            _ => UpstreamError::Rejected(message),
        }
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, UpstreamError::Transient(_))
    }
}

impl From<reqwest_middleware::Error> for UpstreamError {
    fn from(err: reqwest_middleware::Error) -> Self {
        let retryable = reqwest_retry::default_on_request_failure(&err);
        UpstreamError::classified(retryable, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_errors_retry() {
        assert!(UpstreamError::Transient("503".into()).is_transient());
        assert!(!UpstreamError::Rejected("400".into()).is_transient());
        assert!(!UpstreamError::NotFound("404".into()).is_transient());
        assert!(!UpstreamError::InvalidResponse("bad json".into()).is_transient());
    }

    #[test]
    fn test_classification() {
        let err = UpstreamError::classified(Some(Retryable::Transient), "timeout".into());
        assert!(err.is_transient());
        let err = UpstreamError::classified(Some(Retryable::Fatal), "bad request".into());
        assert!(matches!(err, UpstreamError::Rejected(_)));
        let err = UpstreamError::classified(None, "odd".into());
        assert!(matches!(err, UpstreamError::Rejected(_)));
    }
}
