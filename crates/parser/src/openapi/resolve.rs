//! Endpoint URL resolution

use super::types::DocumentBase;
use url::Url;

/// Resolves `path` templates into full endpoint URLs
#[derive(Debug, Clone, Default)]
pub struct UrlResolver {
    /// Replaces any base the document declares
    base_url_override: Option<String>,

    /// URL the document was fetched from; host-less bases are resolved
    /// against it as URL references
    document_url: Option<Url>,
}

impl UrlResolver {
    pub fn new(base_url_override: Option<String>, document_url: Option<Url>) -> Self {
        Self {
            base_url_override: base_url_override.filter(|b| !b.trim().is_empty()),
            document_url: document_url.filter(|url| url.has_host()),
        }
    }

    /// Resolve a path against the document base
    ///
    /// `servers` are operation- or path-level OpenAPI 3 overrides, already
    /// ordered by precedence; the first non-empty list wins over the document
    /// servers.
    pub fn resolve(&self, base: &DocumentBase, servers: &[&[String]], path: &str) -> String {
        if let Some(override_base) = &self.base_url_override {
            return join_url(override_base, path);
        }

        match base {
            DocumentBase::Swagger2 {
                scheme,
                host: Some(host),
                base_path,
            } => join_url(&format!("{}://{}/{}", scheme, host, base_path), path),
            DocumentBase::Swagger2 {
                host: None,
                base_path,
                ..
            } => join_url(&self.anchor(base_path), path),
            DocumentBase::OpenApi3 {
                servers: document_servers,
            } => {
                let server = servers
                    .iter()
                    .find(|list| !list.is_empty())
                    .and_then(|list| list.first())
                    .or_else(|| document_servers.first());
                match server {
                    Some(server) if is_absolute(server) => join_url(server, path),
                    Some(server) if !server.trim().is_empty() => {
                        join_url(&self.anchor(server), path)
                    }
                    _ => join_url(&self.anchor("/"), path),
                }
            }
            DocumentBase::Unversioned => join_url(&self.anchor("/"), path),
        }
    }

    // Resolve a host-less base (`/api`, `v1`, `//host/v1`) against the
    // document URL when one is known.
    fn anchor(&self, reference: &str) -> String {
        self.document_url
            .as_ref()
            .and_then(|document_url| document_url.join(reference.trim()).ok())
            .map(String::from)
            .unwrap_or_else(|| reference.to_string())
    }
}

// `scheme://...` with a syntactically valid scheme
fn is_absolute(url: &str) -> bool {
    match url.trim().split_once("://") {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Concatenate a base URL and a path, collapsing duplicate slashes
///
/// The `scheme://` separator is preserved. A base without a scheme yields a
/// path-absolute relative URL.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim();
    let (scheme, rest) = match base.find("://") {
        Some(idx) => (&base[..idx + 3], &base[idx + 3..]),
        None => ("", base),
    };

    let mut joined = String::with_capacity(rest.len() + path.len() + 1);
    let mut previous_slash = false;
    for ch in rest.chars().chain(std::iter::once('/')).chain(path.chars()) {
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        joined.push(ch);
    }

    if scheme.is_empty() && !joined.starts_with('/') {
        joined.insert(0, '/');
    }
    format!("{}{}", scheme, joined)
}
