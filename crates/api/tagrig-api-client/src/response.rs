use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Result envelope returned by every client call.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ApiResponse {
    pub fn ok(data: Option<Value>, status_code: u16) -> Self {
        Self {
            success: true,
            data,
            error: None,
            status_code: Some(status_code),
        }
    }

    pub fn failure(error: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            status_code,
        }
    }

    /// Field of the response body, e.g. `submission_id`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.as_ref()?.get(key)
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        let status = err.status_code();
        let message = match err {
            ApiError::Api { message, .. } => message,
            other => other.to_string(),
        };
        ApiResponse::failure(message, status)
    }
}
