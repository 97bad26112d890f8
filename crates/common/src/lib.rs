//! Common types and utilities for api-survey
//!
//! This crate contains the endpoint result model, the run configuration and
//! the error types shared by the parser, prober, report and CLI crates.

mod config;
mod model;

pub use config::{
    MethodAllowList, RunConfig, DEFAULT_FETCH_TIMEOUT_SECONDS,
    DEFAULT_INTER_REQUEST_DELAY_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
pub use model::{ApiInfo, EndpointRecord, HttpMethod, ProbeStatus, UnknownMethod};

use thiserror::Error;

/// Errors that abort a survey run
///
/// Per-endpoint probe failures are never represented here; they are recorded
/// on the endpoint as a [`ProbeStatus`].
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for survey operations
pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SurveyError::MalformedDocument("missing 'paths'".to_string());
        assert_eq!(err.to_string(), "Malformed document: missing 'paths'");

        let err = SurveyError::Fetch("connection refused".to_string());
        assert_eq!(err.to_string(), "Fetch error: connection refused");
    }

    #[test]
    fn test_io_error_converts() {
        fn create() -> Result<()> {
            let denied: std::io::Result<()> = Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            ));
            denied?;
            Ok(())
        }
        assert!(matches!(create(), Err(SurveyError::Io(_))));
    }
}
