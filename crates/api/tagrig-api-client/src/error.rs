//! Client-side errors. Callers of [`ApiClient`](crate::ApiClient) see these folded into
//! a failed [`ApiResponse`](crate::ApiResponse); the transport and validation layers
//! return them directly.

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with a non-success status
    #[error("API responded with error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("Endpoint '{endpoint}' needs parameter '{param}'")]
    MissingParameter { endpoint: String, param: String },

    /// Submission rejected before sending
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "transport",
            Self::Api { .. } => "http",
            Self::Parse(_) => "serialization",
            Self::UnknownEndpoint(_) | Self::MissingParameter { .. } | Self::Validation(_) => {
                "validation"
            }
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Connection(err.to_string())
    }
}
