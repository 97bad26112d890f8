//! API document download

use crate::transport::USER_AGENT;
use api_survey_common::{Result, SurveyError};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Future returned by [`DocumentSource::fetch`]
pub type DocumentFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// Provides the raw API document for a URL
#[cfg_attr(test, mockall::automock)]
pub trait DocumentSource: Send + Sync {
    /// Fails with [`SurveyError::Fetch`] when the document is unreachable or
    /// is not JSON
    fn fetch(&self, url: &str) -> DocumentFuture;
}

/// Fetches documents over HTTP(S)
#[derive(Clone)]
pub struct HttpDocumentSource {
    client: reqwest::Client,
}

impl HttpDocumentSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SurveyError::Client(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl DocumentSource for HttpDocumentSource {
    fn fetch(&self, url: &str) -> DocumentFuture {
        let client = self.client.clone();
        let url = url.to_string();
        Box::pin(async move {
            let response = client
                .get(&url)
                .send()
                .await
                .map_err(|e| SurveyError::Fetch(format!("Failed to request {}: {}", url, e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SurveyError::Fetch(format!(
                    "{} returned HTTP {}",
                    url, status
                )));
            }

            let body = response
                .text()
                .await
                .map_err(|e| SurveyError::Fetch(format!("Failed to read {}: {}", url, e)))?;
            debug!(%url, bytes = body.len(), "fetched API document");

            parse_document_body(&body)
        })
    }
}

/// Parse a response body as a JSON document
///
/// Some gateways serve the document as a JSON string literal containing the
/// real document; that form is unwrapped once.
pub fn parse_document_body(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| SurveyError::Fetch(format!("Response is not valid JSON: {}", e)))?;

    match value {
        Value::String(inner) => serde_json::from_str(inner.trim()).map_err(|e| {
            SurveyError::Fetch(format!("Response is a JSON string without a document: {}", e))
        }),
        other => Ok(other),
    }
}
