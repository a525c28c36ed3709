//! Versioned endpoint table of the dataset service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const API_VERSION: &str = "v1";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    /// Path below the version prefix; may contain `{param}` placeholders.
    pub path: &'static str,
    pub method: Method,
    pub requires_auth: bool,
    /// Requests per minute.
    pub rate_limit: u32,
    /// Seconds a GET response may be served from cache.
    pub cache_ttl: u64,
}

const DEFAULT_RATE_LIMIT: u32 = 60;
const DEFAULT_CACHE_TTL: u64 = 300;

const fn endpoint(name: &'static str, path: &'static str, method: Method) -> Endpoint {
    Endpoint {
        name,
        path,
        method,
        requires_auth: true,
        rate_limit: DEFAULT_RATE_LIMIT,
        cache_ttl: DEFAULT_CACHE_TTL,
    }
}

const fn rate(mut e: Endpoint, rate_limit: u32) -> Endpoint {
    e.rate_limit = rate_limit;
    e
}

const fn ttl(mut e: Endpoint, cache_ttl: u64) -> Endpoint {
    e.cache_ttl = cache_ttl;
    e
}

pub const ENDPOINTS: [Endpoint; 11] = [
    rate(endpoint("submit_annotation", "annotations/submit", Method::Post), 30),
    ttl(
        endpoint("get_submission_status", "submissions/{submission_id}", Method::Get),
        60,
    ),
    ttl(endpoint("get_dataset_info", "datasets/{dataset_id}", Method::Get), 3600),
    ttl(endpoint("list_datasets", "datasets/list", Method::Get), 3600),
    rate(endpoint("create_dataset", "datasets/create", Method::Post), 10),
    rate(endpoint("update_dataset", "datasets/{dataset_id}", Method::Put), 10),
    endpoint("delete_submission", "submissions/{submission_id}", Method::Delete),
    ttl(endpoint("get_user_stats", "users/stats", Method::Get), 300),
    ttl(endpoint("validate_token", "auth/validate", Method::Get), 3600),
    ttl(
        rate(endpoint("search_annotations", "annotations/search", Method::Post), 30),
        60,
    ),
    ttl(
        endpoint("get_annotation_metrics", "annotations/metrics/{annotation_id}", Method::Get),
        3600,
    ),
];

pub fn get_endpoint(name: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().find(|e| e.name == name)
}

impl Endpoint {
    /// `/<version>/<path>` with placeholders left in place.
    pub fn full_path(&self, version: &str) -> String {
        format!("/{}/{}", version, self.path.trim_start_matches('/'))
    }

    /// Substitute every `{name}` placeholder from `params`.
    pub fn format_path(&self, params: &[(&str, &str)]) -> Result<String, ApiError> {
        let mut out = String::with_capacity(self.path.len());
        let mut rest = self.path;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| ApiError::MissingParameter {
                endpoint: self.name.to_string(),
                param: after.to_string(),
            })?;
            let key = &after[..close];
            let value = params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .ok_or_else(|| ApiError::MissingParameter {
                    endpoint: self.name.to_string(),
                    param: key.to_string(),
                })?;
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
