//! Endpoint result model
//!
//! An [`EndpointRecord`] is created once by the parser, has its
//! `probe_status` written at most once by the prober, and is then handed
//! read-only to the report writers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// HTTP methods that can appear as operations in an API document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// All supported methods, in the order they are listed in help output
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Uppercase method name (e.g., "GET")
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Whether a probe of this method sends a JSON body
    pub fn sends_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a supported HTTP method
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownMethod(trimmed.to_string()))
    }
}

/// Outcome of probing a single endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Not probed: filtered out, over the limit, interrupted, or probing skipped
    #[default]
    NotRequested,

    /// 2xx response
    Success { code: u16, body_length: u64 },

    /// 3xx response
    Redirect { code: u16 },

    /// 4xx response
    ClientError { code: u16 },

    /// 5xx response
    ServerError { code: u16 },

    /// A response whose status falls outside 200-599
    Unexpected { code: u16 },

    /// The request did not complete within the configured timeout
    Timeout,

    /// DNS, connect, TLS or any other transport-level failure
    ConnectionError,
}

impl ProbeStatus {
    /// HTTP status code, when a response was received
    pub fn code(&self) -> Option<u16> {
        match *self {
            ProbeStatus::Success { code, .. }
            | ProbeStatus::Redirect { code }
            | ProbeStatus::ClientError { code }
            | ProbeStatus::ServerError { code }
            | ProbeStatus::Unexpected { code } => Some(code),
            ProbeStatus::NotRequested | ProbeStatus::Timeout | ProbeStatus::ConnectionError => {
                None
            }
        }
    }

    /// Body length in bytes; only successful responses report one
    pub fn body_length(&self) -> Option<u64> {
        match *self {
            ProbeStatus::Success { body_length, .. } => Some(body_length),
            _ => None,
        }
    }

    pub fn is_requested(&self) -> bool {
        !matches!(self, ProbeStatus::NotRequested)
    }

    /// Short human-readable label used by the exporters
    pub fn label(&self) -> String {
        match self {
            ProbeStatus::NotRequested => "Skipped".to_string(),
            ProbeStatus::Timeout => "Timeout".to_string(),
            ProbeStatus::ConnectionError => "Connection error".to_string(),
            other => other
                .code()
                .map(|code| code.to_string())
                .unwrap_or_default(),
        }
    }
}

/// One logical API operation: a (path, method) pair from the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// Path template as declared (e.g., "/users/{id}")
    pub path: String,

    /// Normalized HTTP method
    pub method: HttpMethod,

    /// Operation summary, empty when the document has none
    pub summary: String,

    /// Operation description, empty when the document has none
    pub description: String,

    /// `operationId`, empty when the document has none
    pub operation_id: String,

    /// Grouping labels in declaration order, without duplicates
    pub tags: Vec<String>,

    /// Path resolved against the document's base URL
    pub full_url: String,

    /// Probe outcome
    #[serde(default)]
    pub probe_status: ProbeStatus,
}

impl EndpointRecord {
    /// Create a record with empty descriptive fields and no probe result
    pub fn new(path: impl Into<String>, method: HttpMethod, full_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            summary: String::new(),
            description: String::new(),
            operation_id: String::new(),
            tags: Vec::new(),
            full_url: full_url.into(),
            probe_status: ProbeStatus::NotRequested,
        }
    }

    /// Append a tag unless it is already present
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Summary, falling back to the operation id
    pub fn display_name(&self) -> &str {
        if self.summary.is_empty() {
            &self.operation_id
        } else {
            &self.summary
        }
    }
}

/// API metadata from the document's `info` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl ApiInfo {
    pub const DEFAULT_TITLE: &'static str = "API Documentation";
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: Self::DEFAULT_TITLE.to_string(),
            version: String::new(),
            description: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!(" Delete ".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert_eq!("OPTIONS".parse::<HttpMethod>(), Ok(HttpMethod::Options));
        assert_eq!(
            "trace".parse::<HttpMethod>(),
            Err(UnknownMethod("trace".to_string()))
        );
    }

    #[test]
    fn test_method_serializes_uppercase() {
        let json = serde_json::to_string(&HttpMethod::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
    }

    #[test]
    fn test_push_tag_deduplicates_in_order() {
        let mut record = EndpointRecord::new("/pets", HttpMethod::Get, "http://x/pets");
        record.push_tag("pets");
        record.push_tag("store");
        record.push_tag("pets");
        assert_eq!(record.tags, vec!["pets", "store"]);
    }

    #[test]
    fn test_display_name_falls_back_to_operation_id() {
        let mut record = EndpointRecord::new("/pets", HttpMethod::Get, "http://x/pets");
        record.operation_id = "listPets".to_string();
        assert_eq!(record.display_name(), "listPets");

        record.summary = "List all pets".to_string();
        assert_eq!(record.display_name(), "List all pets");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ProbeStatus::NotRequested.label(), "Skipped");
        assert_eq!(ProbeStatus::Timeout.label(), "Timeout");
        assert_eq!(ProbeStatus::ConnectionError.label(), "Connection error");
        assert_eq!(
            ProbeStatus::Success {
                code: 204,
                body_length: 0
            }
            .label(),
            "204"
        );
        assert_eq!(ProbeStatus::ServerError { code: 503 }.label(), "503");
    }

    #[test]
    fn test_status_accessors() {
        let ok = ProbeStatus::Success {
            code: 200,
            body_length: 42,
        };
        assert_eq!(ok.code(), Some(200));
        assert_eq!(ok.body_length(), Some(42));
        assert!(ok.is_requested());

        assert_eq!(ProbeStatus::Redirect { code: 301 }.body_length(), None);
        assert_eq!(ProbeStatus::Timeout.code(), None);
        assert!(!ProbeStatus::NotRequested.is_requested());
    }
}
