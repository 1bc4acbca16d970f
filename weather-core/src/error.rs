use thiserror::Error;

/// Why a lookup produced no report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("city not found")]
    NotFound,

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LookupError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            // The URL carries the API key as a query parameter.
            Self::NetworkFailure(err.without_url().to_string())
        }
    }

    /// Transient failures worth trying again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::Timeout)
    }
}
