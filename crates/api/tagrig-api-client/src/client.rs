//! Dataset service client.
//!
//! Every call returns an [`ApiResponse`]; transport and HTTP failures are logged and
//! folded into `success: false` envelopes instead of being returned as errors.

use std::time::Duration;

use log::{error, info};
use serde_json::{json, Value};

use crate::cache::{cache_key, ResponseCache};
use crate::config::ClientConfig;
use crate::endpoints::{get_endpoint, Method};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::submission::Submission;
use crate::transport::{ApiRequest, HttpTransport, Transport, TransportResponse};

pub const USER_AGENT: &str = "tagrig-client/v1";

pub struct ApiClient<T: Transport> {
    transport: T,
    api_key: String,
    base_url: String,
    api_version: String,
    cache: ResponseCache,
}

impl ApiClient<HttpTransport> {
    /// Client over the blocking HTTP transport.
    pub fn connect(api_key: impl Into<String>, config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::with_timeout(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(transport, api_key, config))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, api_key: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            cache: ResponseCache::new(
                config.cache_max_entries,
                Duration::from_secs(config.cache_ttl_secs),
            ),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn headers(&self, requires_auth: bool) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];
        if requires_auth {
            headers.push(("Authorization".to_string(), format!("Bearer {}", self.api_key)));
        }
        headers
    }

    fn build_request(
        &self,
        endpoint_name: &str,
        params: &[(&str, &str)],
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<(ApiRequest, u64), ApiError> {
        let endpoint = get_endpoint(endpoint_name)
            .ok_or_else(|| ApiError::UnknownEndpoint(endpoint_name.to_string()))?;
        let path = endpoint.format_path(params)?;
        let request = ApiRequest {
            method: endpoint.method,
            url: format!("{}/{}/{}", self.base_url, self.api_version, path),
            headers: self.headers(endpoint.requires_auth),
            query,
            body,
        };
        Ok((request, endpoint.cache_ttl))
    }

    fn interpret(response: TransportResponse) -> Result<ApiResponse, ApiError> {
        let body: Option<Value> = if response.body.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&response.body).ok()
        };
        if (200..300).contains(&response.status) {
            if body.is_none() && !response.body.trim().is_empty() {
                return Err(ApiError::Parse(format!(
                    "non-JSON body with status {}",
                    response.status
                )));
            }
            return Ok(ApiResponse::ok(body, response.status));
        }
        let message = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        Err(ApiError::Api {
            status_code: response.status,
            message,
        })
    }

    /// Resolve, send and interpret one endpoint call. Successful GETs are cached.
    pub fn call(
        &mut self,
        endpoint_name: &str,
        params: &[(&str, &str)],
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> ApiResponse {
        let (request, ttl) = match self.build_request(endpoint_name, params, query, body) {
            Ok(built) => built,
            Err(err) => {
                error!("API request failed: {err}");
                return err.into();
            }
        };

        let key = (request.method == Method::Get).then(|| {
            cache_key(
                request.method.as_str(),
                &request.url,
                &request.query,
                request.body.as_ref(),
            )
        });
        if let Some(hit) = key.as_deref().and_then(|k| self.cache.get(k)) {
            return hit;
        }

        let result = self
            .transport
            .send(&request)
            .and_then(Self::interpret);
        match result {
            Ok(response) => {
                if let Some(key) = key {
                    self.cache
                        .insert(key, response.clone(), Some(Duration::from_secs(ttl)));
                }
                response
            }
            Err(err) => {
                error!("API request failed: {err}");
                err.into()
            }
        }
    }

    pub fn submit_annotation(&mut self, data: Value) -> ApiResponse {
        self.call("submit_annotation", &[], Vec::new(), Some(data))
    }

    /// Validate a submission package locally, then send it.
    pub fn submit(&mut self, submission: &Submission) -> ApiResponse {
        let data = match submission.to_validated_value() {
            Ok(data) => data,
            Err(err) => {
                error!("submission rejected: {err}");
                return err.into();
            }
        };
        let response = self.submit_annotation(data);
        if response.success {
            info!(
                "submitted {} objects (id {})",
                submission.objects.len(),
                response
                    .field("submission_id")
                    .and_then(Value::as_str)
                    .unwrap_or("?")
            );
        }
        response
    }

    pub fn get_submission_status(&mut self, submission_id: &str) -> ApiResponse {
        self.call(
            "get_submission_status",
            &[("submission_id", submission_id)],
            Vec::new(),
            None,
        )
    }

    pub fn get_dataset_info(&mut self, dataset_id: &str) -> ApiResponse {
        self.call("get_dataset_info", &[("dataset_id", dataset_id)], Vec::new(), None)
    }

    pub fn list_datasets(&mut self, page: u32, per_page: u32) -> ApiResponse {
        let query = vec![
            ("page".to_string(), page.to_string()),
            ("per_page".to_string(), per_page.to_string()),
        ];
        self.call("list_datasets", &[], query, None)
    }

    pub fn create_dataset(&mut self, name: &str, description: &str) -> ApiResponse {
        let body = json!({ "name": name, "description": description });
        self.call("create_dataset", &[], Vec::new(), Some(body))
    }

    pub fn update_dataset(&mut self, dataset_id: &str, data: Value) -> ApiResponse {
        self.call("update_dataset", &[("dataset_id", dataset_id)], Vec::new(), Some(data))
    }

    pub fn delete_submission(&mut self, submission_id: &str) -> ApiResponse {
        self.call(
            "delete_submission",
            &[("submission_id", submission_id)],
            Vec::new(),
            None,
        )
    }

    pub fn get_user_stats(&mut self) -> ApiResponse {
        self.call("get_user_stats", &[], Vec::new(), None)
    }

    pub fn validate_token(&mut self) -> ApiResponse {
        self.call("validate_token", &[], Vec::new(), None)
    }

    pub fn search_annotations(&mut self, query: &str, filters: Option<Value>) -> ApiResponse {
        let body = json!({ "query": query, "filters": filters.unwrap_or_else(|| json!({})) });
        self.call("search_annotations", &[], Vec::new(), Some(body))
    }

    pub fn get_annotation_metrics(&mut self, annotation_id: &str) -> ApiResponse {
        self.call(
            "get_annotation_metrics",
            &[("annotation_id", annotation_id)],
            Vec::new(),
            None,
        )
    }

    /// Submit each package in order; one response per package.
    pub fn batch_submit(&mut self, submissions: Vec<Value>) -> Vec<ApiResponse> {
        submissions
            .into_iter()
            .map(|s| self.submit_annotation(s))
            .collect()
    }
}
