use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};
use tagrig_api_client::{
    ApiClient, ApiError, ApiRequest, ClientConfig, HostInfo, Method, Submission, Transport,
    TransportResponse,
};
use tagrig_annotation_core::{AnnotationDocument, ExportOptions, ExportPayload};

/// Replays canned responses and records every request it sees.
#[derive(Default)]
struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<TransportResponse, ApiError>>>,
    seen: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn reply(self, status: u16, body: Value) -> Self {
        self.replies.borrow_mut().push_back(Ok(TransportResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    fn fail(self, err: ApiError) -> Self {
        self.replies.borrow_mut().push_back(Err(err));
        self
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.seen.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<TransportResponse, ApiError> {
        self.seen.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Connection("no scripted reply".into())))
    }
}

fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
    let config = ClientConfig::default().with_base_url("https://api.example.test/");
    ApiClient::with_transport(transport, "secret", &config)
}

#[test]
fn requests_carry_auth_and_versioned_url() {
    let mut api = client(ScriptedTransport::default().reply(200, json!({"status": "queued"})));
    let resp = api.get_submission_status("s-42");
    assert!(resp.success);
    assert_eq!(resp.field("status"), Some(&json!("queued")));

    let req = &api.transport().requests()[0];
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.url, "https://api.example.test/v1/submissions/s-42");
    assert_eq!(req.header("authorization"), Some("Bearer secret"));
    assert_eq!(req.header("User-Agent"), Some("tagrig-client/v1"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
}

#[test]
fn get_responses_are_cached_by_signature() {
    let transport = ScriptedTransport::default()
        .reply(200, json!({"datasets": [1]}))
        .reply(200, json!({"datasets": [2]}));
    let mut api = client(transport);

    let first = api.list_datasets(1, 20);
    let again = api.list_datasets(1, 20);
    assert_eq!(first, again);
    assert_eq!(api.transport().requests().len(), 1);

    let other_page = api.list_datasets(2, 20);
    assert_eq!(other_page.field("datasets"), Some(&json!([2])));
    assert_eq!(api.transport().requests().len(), 2);
    assert_eq!(
        api.transport().requests()[1].query,
        vec![
            ("page".to_string(), "2".to_string()),
            ("per_page".to_string(), "20".to_string())
        ]
    );
}

#[test]
fn posts_are_never_cached() {
    let transport = ScriptedTransport::default()
        .reply(200, json!({"hits": []}))
        .reply(200, json!({"hits": []}));
    let mut api = client(transport);
    api.search_annotations("wheel", None);
    api.search_annotations("wheel", None);
    let seen = api.transport().requests();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].body, Some(json!({"query": "wheel", "filters": {}})));
    assert!(api.cache().is_empty());
}

#[test]
fn http_errors_use_server_message() {
    let transport = ScriptedTransport::default()
        .reply(401, json!({"error": "token expired"}))
        .reply(500, json!("oops"));
    let mut api = client(transport);

    let resp = api.validate_token();
    assert!(!resp.success);
    assert_eq!(resp.error.as_deref(), Some("token expired"));
    assert_eq!(resp.status_code, Some(401));

    let resp = api.get_user_stats();
    assert_eq!(resp.error.as_deref(), Some("HTTP 500"));
    // Failures are not cached.
    assert!(api.cache().is_empty());
}

#[test]
fn transport_failures_become_envelopes() {
    let transport = ScriptedTransport::default().fail(ApiError::Connection("timed out".into()));
    let mut api = client(transport);
    let resp = api.delete_submission("s-1");
    assert!(!resp.success);
    assert_eq!(resp.status_code, None);
    assert!(resp.error.unwrap().contains("timed out"));
    assert_eq!(api.transport().requests()[0].method, Method::Delete);
}

#[test]
fn dataset_calls_hit_their_endpoints() {
    let transport = ScriptedTransport::default()
        .reply(201, json!({"id": "d1"}))
        .reply(200, json!({"id": "d1"}))
        .reply(200, json!({"id": "d1", "name": "cars"}))
        .reply(200, json!({"score": 0.9}));
    let mut api = client(transport);
    assert!(api.create_dataset("cars", "vehicle parts").success);
    assert!(api.update_dataset("d1", json!({"public": true})).success);
    assert!(api.get_dataset_info("d1").success);
    assert!(api.get_annotation_metrics("a7").success);

    let urls: Vec<(Method, String)> = api
        .transport()
        .requests()
        .into_iter()
        .map(|r| (r.method, r.url))
        .collect();
    let base = "https://api.example.test/v1";
    assert_eq!(
        urls,
        vec![
            (Method::Post, format!("{base}/datasets/create")),
            (Method::Put, format!("{base}/datasets/d1")),
            (Method::Get, format!("{base}/datasets/d1")),
            (Method::Get, format!("{base}/annotations/metrics/a7")),
        ]
    );
}

#[test]
fn submission_from_fixture_document() {
    let path = tagrig_test_fixtures::documents::path("shot010").unwrap();
    let doc = AnnotationDocument::load(path).unwrap();
    let host = HostInfo {
        host_version: "4.2.0".into(),
        plugin_version: "0.1.0".into(),
        frame_range: (1, 120),
    };
    let submission = Submission::from_document(&doc, ExportOptions::default(), &host);

    let transport = ScriptedTransport::default().reply(201, json!({"submission_id": "s-9"}));
    let mut api = client(transport);
    let resp = api.submit(&submission);
    assert!(resp.success);
    assert_eq!(resp.status_code, Some(201));

    let body = api.transport().requests()[0].body.clone().unwrap();
    assert_eq!(body["metadata"]["submission_type"], "full");
    assert_eq!(body["objects"].as_array().unwrap().len(), 1);
    assert_eq!(body["objects"][0]["mesh_annotations"][0]["vertices"], json!([0, 1, 2]));
}

#[test]
fn invalid_submission_is_not_sent() {
    let empty = AnnotationDocument::new("Empty");
    let submission =
        Submission::from_document(&empty, ExportOptions::default(), &HostInfo::default());
    let mut api = client(ScriptedTransport::default());
    let resp = api.submit(&submission);
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("No annotated objects"));
    assert!(api.transport().requests().is_empty());
}

#[test]
fn batch_submit_keeps_order() {
    let payload: ExportPayload = tagrig_test_fixtures::payloads::load("rig").unwrap();
    let body = serde_json::to_value(&payload).unwrap();
    let transport = ScriptedTransport::default()
        .reply(201, json!({"submission_id": "a"}))
        .reply(429, json!({"error": "rate limited"}));
    let mut api = client(transport);
    let responses = api.batch_submit(vec![body.clone(), body]);
    assert_eq!(responses.len(), 2);
    assert!(responses[0].success);
    assert_eq!(responses[1].error.as_deref(), Some("rate limited"));
}
