//! Document shape classification
//!
//! A raw document is classified once into a [`DocumentVersion`], and its
//! base-URL declaration is captured as a [`DocumentBase`] variant. Everything
//! after this step works on the tagged union instead of probing fields.

use serde::Serialize;
use serde_json::{Map, Value};

/// Shape of an API description document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentVersion {
    /// Swagger 2.0: `host` / `basePath` / `schemes`
    Swagger2,

    /// OpenAPI 3.x: `servers`
    OpenApi3,

    /// No version field and no base declaration of either kind
    Unversioned,
}

impl DocumentVersion {
    /// Classify a document from its discriminator field
    ///
    /// `swagger: "2.x"` and `openapi: "3.x"` win. Without either, the shape is
    /// inferred from which base declaration is present.
    pub fn detect(doc: &Map<String, Value>) -> Self {
        if let Some(v) = doc.get("swagger").and_then(version_text) {
            if v.starts_with('2') {
                return DocumentVersion::Swagger2;
            }
        }
        if let Some(v) = doc.get("openapi").and_then(version_text) {
            if v.starts_with('3') {
                return DocumentVersion::OpenApi3;
            }
        }

        if doc.contains_key("servers") {
            DocumentVersion::OpenApi3
        } else if ["host", "basePath", "schemes"]
            .iter()
            .any(|key| doc.contains_key(*key))
        {
            DocumentVersion::Swagger2
        } else {
            DocumentVersion::Unversioned
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentVersion::Swagger2 => "Swagger 2.0",
            DocumentVersion::OpenApi3 => "OpenAPI 3",
            DocumentVersion::Unversioned => "unversioned",
        }
    }
}

// Some generators emit `"swagger": 2.0` as a number.
fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Base-URL declaration of a document, per shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBase {
    Swagger2 {
        /// First declared scheme, `http` when none
        scheme: String,
        host: Option<String>,
        /// `basePath`, `/` when absent
        base_path: String,
    },
    OpenApi3 {
        /// Document-level server URLs with variables substituted
        servers: Vec<String>,
    },
    Unversioned,
}

impl DocumentBase {
    /// Capture the base declaration for an already-classified document
    pub fn from_document(version: DocumentVersion, doc: &Map<String, Value>) -> Self {
        match version {
            DocumentVersion::Swagger2 => {
                // Some documents put a full origin in `host`; its scheme wins.
                let (host_scheme, host) = match doc.get("host").and_then(Value::as_str) {
                    Some(raw) => split_host(raw),
                    None => (None, None),
                };
                let scheme = host_scheme
                    .or_else(|| {
                        doc.get("schemes")
                            .and_then(Value::as_array)
                            .and_then(|schemes| schemes.iter().find_map(Value::as_str))
                            .filter(|s| !s.trim().is_empty())
                            .map(|s| s.trim().to_ascii_lowercase())
                    })
                    .unwrap_or_else(|| "http".to_string());
                let base_path = doc
                    .get("basePath")
                    .and_then(Value::as_str)
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or("/")
                    .trim()
                    .to_string();
                DocumentBase::Swagger2 {
                    scheme,
                    host,
                    base_path,
                }
            }
            DocumentVersion::OpenApi3 => DocumentBase::OpenApi3 {
                servers: server_urls(doc.get("servers")),
            },
            DocumentVersion::Unversioned => DocumentBase::Unversioned,
        }
    }
}

// `host` as (scheme, host) with an optional leading `scheme://` removed
fn split_host(raw: &str) -> (Option<String>, Option<String>) {
    let raw = raw.trim();
    let (scheme, rest) = match raw.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() => (Some(scheme.to_ascii_lowercase()), rest),
        _ => (None, raw),
    };
    let host = rest.trim_end_matches('/').to_string();
    (scheme, Some(host).filter(|h| !h.is_empty()))
}

/// Server URLs from an OpenAPI 3 `servers` array, in declaration order
///
/// Entries without a string `url` are ignored. `{name}` placeholders are
/// replaced with the variable's `default` when one is declared.
pub fn server_urls(servers: Option<&Value>) -> Vec<String> {
    servers
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|server| {
                    let url = server.get("url")?.as_str()?;
                    Some(substitute_variables(url.trim(), server.get("variables")))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn substitute_variables(url: &str, variables: Option<&Value>) -> String {
    let Some(variables) = variables.and_then(Value::as_object) else {
        return url.to_string();
    };

    let mut resolved = url.to_string();
    for (name, variable) in variables {
        if let Some(default) = variable.get("default").and_then(Value::as_str) {
            resolved = resolved.replace(&format!("{{{}}}", name), default);
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_detect_by_discriminator() {
        let v2 = object(json!({"swagger": "2.0", "paths": {}}));
        assert_eq!(DocumentVersion::detect(&v2), DocumentVersion::Swagger2);

        let v3 = object(json!({"openapi": "3.1.0", "paths": {}}));
        assert_eq!(DocumentVersion::detect(&v3), DocumentVersion::OpenApi3);

        let numeric = object(json!({"swagger": 2.0, "paths": {}}));
        assert_eq!(DocumentVersion::detect(&numeric), DocumentVersion::Swagger2);
    }

    #[test]
    fn test_detect_by_shape() {
        let servers = object(json!({"servers": [], "paths": {}}));
        assert_eq!(DocumentVersion::detect(&servers), DocumentVersion::OpenApi3);

        let host = object(json!({"host": "api.example.com", "paths": {}}));
        assert_eq!(DocumentVersion::detect(&host), DocumentVersion::Swagger2);

        let bare = object(json!({"paths": {}}));
        assert_eq!(DocumentVersion::detect(&bare), DocumentVersion::Unversioned);
    }

    #[test]
    fn test_swagger2_base_defaults() {
        let doc = object(json!({"swagger": "2.0", "host": "api.example.com"}));
        let base = DocumentBase::from_document(DocumentVersion::Swagger2, &doc);
        assert_eq!(
            base,
            DocumentBase::Swagger2 {
                scheme: "http".to_string(),
                host: Some("api.example.com".to_string()),
                base_path: "/".to_string(),
            }
        );
    }

    #[test]
    fn test_swagger2_base_uses_first_scheme() {
        let doc = object(json!({
            "swagger": "2.0",
            "host": "api.example.com",
            "basePath": "/v1",
            "schemes": ["HTTPS", "http"]
        }));
        match DocumentBase::from_document(DocumentVersion::Swagger2, &doc) {
            DocumentBase::Swagger2 {
                scheme, base_path, ..
            } => {
                assert_eq!(scheme, "https");
                assert_eq!(base_path, "/v1");
            }
            other => panic!("unexpected base {:?}", other),
        }
    }

    #[test]
    fn test_swagger2_host_with_scheme() {
        let doc = object(json!({
            "swagger": "2.0",
            "host": "HTTPS://api.example.com/",
            "schemes": ["http"]
        }));
        assert_eq!(
            DocumentBase::from_document(DocumentVersion::Swagger2, &doc),
            DocumentBase::Swagger2 {
                scheme: "https".to_string(),
                host: Some("api.example.com".to_string()),
                base_path: "/".to_string(),
            }
        );
    }

    #[test]
    fn test_server_variables_are_substituted() {
        let servers = json!([
            {
                "url": "{scheme}://{region}.example.com/v2",
                "variables": {
                    "scheme": {"default": "https"},
                    "region": {"default": "eu", "enum": ["eu", "us"]}
                }
            },
            {"description": "no url"},
            {"url": "http://fallback.example.com"}
        ]);
        assert_eq!(
            server_urls(Some(&servers)),
            vec![
                "https://eu.example.com/v2".to_string(),
                "http://fallback.example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_server_urls_tolerates_non_array() {
        assert!(server_urls(Some(&json!("https://api.example.com"))).is_empty());
        assert!(server_urls(None).is_empty());
    }
}
