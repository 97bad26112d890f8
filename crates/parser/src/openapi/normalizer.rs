//! Flattens `paths` into endpoint records

use super::resolve::UrlResolver;
use super::types::{server_urls, DocumentBase, DocumentVersion};
use api_survey_common::{ApiInfo, EndpointRecord, HttpMethod, Result, SurveyError};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

/// Result of normalizing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Detected document shape
    pub version: DocumentVersion,

    /// Metadata from the `info` object
    pub info: ApiInfo,

    /// One record per (path, method) pair, in declaration order
    pub records: Vec<EndpointRecord>,
}

/// Converts a raw API document into endpoint records
///
/// Normalization is pure: the same document and options always produce the
/// same records in the same order.
///
/// # Example
/// ```rust,ignore
/// let normalized = Normalizer::new()
///     .with_document_url("http://localhost:8080/v2/api-docs")
///     .normalize_document(&document)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    base_url_override: Option<String>,
    document_url: Option<Url>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every endpoint against this base instead of the declared one
    pub fn with_base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// URL the document was fetched from
    ///
    /// Relative and protocol-relative bases (`/api`, `v1`, `//host/v1`) are
    /// resolved against it. Unparsable URLs are ignored.
    pub fn with_document_url(mut self, document_url: &str) -> Self {
        self.document_url = Url::parse(document_url.trim()).ok();
        self
    }

    /// Normalize into records only
    pub fn normalize(&self, document: &Value) -> Result<Vec<EndpointRecord>> {
        self.normalize_document(document).map(|doc| doc.records)
    }

    /// Normalize into records plus document metadata
    ///
    /// Fails only when the document is not an object or has no `paths`
    /// mapping. Malformed path or operation entries are skipped.
    pub fn normalize_document(&self, document: &Value) -> Result<NormalizedDocument> {
        let doc = document.as_object().ok_or_else(|| {
            SurveyError::MalformedDocument("document root is not a JSON object".to_string())
        })?;

        let paths = match doc.get("paths") {
            None => {
                return Err(SurveyError::MalformedDocument(
                    "missing top-level 'paths'".to_string(),
                ))
            }
            Some(paths) => paths.as_object().ok_or_else(|| {
                SurveyError::MalformedDocument("'paths' is not an object".to_string())
            })?,
        };

        let version = DocumentVersion::detect(doc);
        let base = DocumentBase::from_document(version, doc);
        let resolver = UrlResolver::new(
            self.base_url_override.clone(),
            self.document_url.clone(),
        );
        debug!(version = version.as_str(), paths = paths.len(), "normalizing document");

        let mut records = Vec::new();
        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                warn!(%path, "skipping path entry that is not an object");
                continue;
            };
            extract_operations(path, item, &base, &resolver, &mut records);
        }

        Ok(NormalizedDocument {
            version,
            info: extract_info(doc),
            records,
        })
    }
}

/// Normalize a document with no base override or document URL
pub fn normalize(document: &Value) -> Result<Vec<EndpointRecord>> {
    Normalizer::new().normalize(document)
}

fn extract_operations(
    path: &str,
    item: &Map<String, Value>,
    base: &DocumentBase,
    resolver: &UrlResolver,
    records: &mut Vec<EndpointRecord>,
) {
    let path_servers = match base {
        DocumentBase::OpenApi3 { .. } => server_urls(item.get("servers")),
        _ => Vec::new(),
    };
    let mut seen: Vec<HttpMethod> = Vec::new();

    for (key, operation) in item {
        // `parameters`, `summary`, `servers`, `$ref`, `x-*` and friends
        let Ok(method) = key.parse::<HttpMethod>() else {
            continue;
        };
        let Some(operation) = operation.as_object() else {
            warn!(%path, %method, "skipping operation that is not an object");
            continue;
        };
        if seen.contains(&method) {
            warn!(%path, %method, "skipping duplicate method key");
            continue;
        }
        seen.push(method);

        let operation_servers = match base {
            DocumentBase::OpenApi3 { .. } => server_urls(operation.get("servers")),
            _ => Vec::new(),
        };
        let full_url = resolver.resolve(base, &[&operation_servers, &path_servers], path);

        let mut record = EndpointRecord::new(path, method, full_url);
        record.summary = text(operation, "summary");
        record.description = text(operation, "description");
        record.operation_id = text(operation, "operationId");
        if let Some(tags) = operation.get("tags").and_then(Value::as_array) {
            for tag in tags.iter().filter_map(Value::as_str) {
                record.push_tag(tag);
            }
        }
        records.push(record);
    }
}

fn extract_info(doc: &Map<String, Value>) -> ApiInfo {
    let mut info = ApiInfo::default();
    let Some(raw) = doc.get("info").and_then(Value::as_object) else {
        return info;
    };

    let title = text(raw, "title");
    if !title.trim().is_empty() {
        info.title = title;
    }
    info.description = text(raw, "description");
    info.version = match raw.get("version") {
        Some(Value::Number(n)) => n.to_string(),
        _ => text(raw, "version"),
    };
    info
}

// String field or empty; non-string values degrade to empty.
fn text(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
