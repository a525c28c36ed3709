use serde::{Deserialize, Serialize};

use crate::endpoints::API_VERSION;
use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for [`ApiClient`](crate::ApiClient). Every field is optional in
/// the JSON form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_version: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: API_VERSION.to_string(),
            timeout_secs: 30,
            cache_ttl_secs: 300,
            cache_max_entries: 100,
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
