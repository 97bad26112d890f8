//! Endpoint probing for api-survey
//!
//! This crate selects which normalized endpoints to exercise, probes them one
//! at a time over HTTP, and classifies each outcome onto the record.
//!
//! ## Probing Policy
//!
//! - DELETE endpoints are never probed unless explicitly included, even when
//!   the method allow-list names DELETE
//! - `limit` keeps the first N eligible endpoints in declaration order
//! - Requests are strictly sequential with a fixed delay between them
//! - Timeouts, connection failures and 4xx/5xx responses are recorded, never
//!   raised
//!
//! The document fetch and the whole pipeline live here too, so the CLI only
//! wires configuration, signal handling and report output.

pub mod fetch;
pub mod filter;
pub mod harness;
pub mod survey;
pub mod transport;

pub use fetch::{parse_document_body, DocumentFuture, DocumentSource, HttpDocumentSource};
pub use filter::{is_eligible, select, select_for, Selection};
pub use harness::{
    classify, probe, Interrupt, ProbeHarness, ProbeOptions, ProbeProgress, ProbeSummary,
};
pub use survey::{run_survey, SurveyEvent, SurveyOutcome};
pub use transport::{
    ProbeFuture, ProbeRequest, ProbeResponse, ReqwestTransport, Transport, TransportError,
};
