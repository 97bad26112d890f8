//! Output file naming

use url::Url;

/// Base name used when the document URL has no usable host
pub const DEFAULT_OUTPUT_NAME: &str = "api_docs";

/// Derive the report base name from the document URL
///
/// Uses the host without its port; any character outside `[A-Za-z0-9_.-]`
/// becomes `_`.
pub fn output_name(document_url: &str) -> String {
    let host = Url::parse(document_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default();

    let name: String = host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() || name == "_" {
        DEFAULT_OUTPUT_NAME.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_is_used() {
        assert_eq!(
            output_name("https://api.example.com/v2/swagger.json"),
            "api.example.com"
        );
    }

    #[test]
    fn test_port_is_removed() {
        assert_eq!(output_name("http://localhost:8080/openapi.json"), "localhost");
    }

    #[test]
    fn test_ipv6_host_is_sanitized() {
        assert_eq!(output_name("http://[::1]:3000/docs"), "___1_");
    }

    #[test]
    fn test_unparseable_url_falls_back() {
        assert_eq!(output_name("not a url"), DEFAULT_OUTPUT_NAME);
        assert_eq!(output_name("file:///tmp/openapi.json"), DEFAULT_OUTPUT_NAME);
    }
}
