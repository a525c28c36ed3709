//! Tagrig API client
//!
//! Thin blocking client for the dataset service: endpoint table, response envelope,
//! response cache, submission packaging and validation. Network access sits behind the
//! [`Transport`] trait; [`HttpTransport`] is the reqwest implementation.

pub mod cache;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod response;
pub mod submission;
pub mod transport;

pub use cache::ResponseCache;
pub use client::{ApiClient, USER_AGENT};
pub use config::ClientConfig;
pub use endpoints::{get_endpoint, Endpoint, Method, API_VERSION, ENDPOINTS};
pub use error::ApiError;
pub use response::ApiResponse;
pub use submission::{validate_submission, HostInfo, Submission, SubmissionMetadata, SubmissionType};
pub use transport::{ApiRequest, HttpTransport, Transport, TransportResponse};
