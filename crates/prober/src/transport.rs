//! HTTP transport used by the probe harness
//!
//! The harness only sees the [`Transport`] trait; [`ReqwestTransport`] is the
//! production implementation.

use api_survey_common::{HttpMethod, Result, SurveyError};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// User agent sent with every probe and document fetch
pub const USER_AGENT: &str = concat!("api-survey/", env!("CARGO_PKG_VERSION"));

/// A single probe request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub method: HttpMethod,
    pub url: String,
}

/// What the harness needs to know about a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body size in bytes
    pub body_length: u64,
}

/// Transport-level failure; never escapes the harness
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}

/// Future returned by [`Transport::send`]
pub type ProbeFuture =
    Pin<Box<dyn Future<Output = std::result::Result<ProbeResponse, TransportError>> + Send>>;

/// Issues probe requests
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    fn send(&self, request: ProbeRequest) -> ProbeFuture;
}

/// reqwest-backed transport
///
/// Redirects are not followed so that 3xx responses are reported as such.
/// POST, PUT and PATCH carry an empty JSON object body.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose client enforces `timeout` per request
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SurveyError::Client(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: ProbeRequest) -> ProbeFuture {
        let client = self.client.clone();
        Box::pin(async move {
            let mut builder = client.request(to_reqwest_method(request.method), &request.url);
            if request.method.sends_body() {
                builder = builder.json(&serde_json::json!({}));
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;

            Ok::<_, TransportError>(ProbeResponse {
                status,
                body_length: body.len() as u64,
            })
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}
