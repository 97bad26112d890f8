//! API document parsing for api-survey
//!
//! This crate turns a raw JSON API description (Swagger 2.0 or OpenAPI 3.x)
//! into the flat endpoint list consumed by the prober and report writers.
//!
//! ## Normalization Strategy
//!
//! The document is classified once from its `swagger` / `openapi`
//! discriminator, then dispatched to a shape-specific base-URL resolver:
//! - Swagger 2.0 → `scheme://host/basePath/path`
//! - OpenAPI 3.x → `servers[0].url + path`
//!
//! Every `(path, method)` pair becomes exactly one record. Missing optional
//! fields degrade to empty values; only a missing or non-object `paths` is
//! fatal.

pub mod openapi;

pub use openapi::{normalize, DocumentVersion, NormalizedDocument, Normalizer};
