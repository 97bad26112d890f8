//! Swagger 2.0 / OpenAPI 3.x normalization
//!
//! Flattens the nested `paths` → method → operation structure of an API
//! document into a flat, ordered list of [`EndpointRecord`]s.
//!
//! ## Supported Shapes
//! - **Swagger 2.0**: base URL built from `schemes[0]://host/basePath`
//! - **OpenAPI 3.x**: base URL taken from the first `servers[].url`, with
//!   path-item and operation-level `servers` taking precedence
//! - **Unversioned**: documents with `paths` but no base declaration
//!
//! ## Usage
//! ```rust,ignore
//! use api_survey_parser::openapi::Normalizer;
//!
//! let document: serde_json::Value = serde_json::from_str(&body)?;
//! let normalized = Normalizer::new().normalize_document(&document)?;
//! println!("{} endpoints", normalized.records.len());
//! ```
//!
//! [`EndpointRecord`]: api_survey_common::EndpointRecord

mod normalizer;
mod resolve;
mod types;

pub use normalizer::{normalize, NormalizedDocument, Normalizer};
pub use resolve::{join_url, UrlResolver};
pub use types::{server_urls, DocumentBase, DocumentVersion};
