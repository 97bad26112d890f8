//! Run configuration
//!
//! One [`RunConfig`] value is threaded through the whole pipeline; nothing
//! reads global state.

use crate::model::HttpMethod;
use std::time::Duration;

/// Per-request probe timeout
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Pause between consecutive probes
pub const DEFAULT_INTER_REQUEST_DELAY_SECONDS: f64 = 0.1;

/// Timeout for downloading the API document itself
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 30;

/// Set of methods eligible for probing
///
/// Matching is case-insensitive at the parsing boundary; internally the set
/// holds normalized [`HttpMethod`] values in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodAllowList {
    methods: Vec<HttpMethod>,
}

impl MethodAllowList {
    pub fn new<I: IntoIterator<Item = HttpMethod>>(methods: I) -> Self {
        methods.into_iter().collect()
    }

    /// Parse a comma-separated list such as `"get, POST,put"`
    ///
    /// Returns the allow-list built from the recognised names together with
    /// the names that were not recognised. Empty items are ignored.
    pub fn parse(input: &str) -> (Self, Vec<String>) {
        let mut invalid = Vec::new();
        let mut list = MethodAllowList::default();

        for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match item.parse::<HttpMethod>() {
                Ok(method) => list.insert(method),
                Err(_) => invalid.push(item.to_string()),
            }
        }

        (list, invalid)
    }

    pub fn insert(&mut self, method: HttpMethod) {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
    }

    pub fn allows(&self, method: HttpMethod) -> bool {
        self.methods.contains(&method)
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn methods(&self) -> &[HttpMethod] {
        &self.methods
    }
}

impl FromIterator<HttpMethod> for MethodAllowList {
    fn from_iter<I: IntoIterator<Item = HttpMethod>>(iter: I) -> Self {
        let mut list = MethodAllowList::default();
        for method in iter {
            list.insert(method);
        }
        list
    }
}

/// Options controlling endpoint selection and probing
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Only probe these methods; `None` allows every method (DELETE still
    /// requires `include_delete`)
    pub method_allow_list: Option<MethodAllowList>,

    /// Allow DELETE endpoints to be probed
    pub include_delete: bool,

    /// Probe at most this many eligible endpoints
    pub limit: Option<usize>,

    /// Extract endpoints only; issue no probe requests
    pub skip_probing: bool,

    /// Hard per-request timeout
    pub timeout_seconds: u64,

    /// Pause after each probe except the last
    pub inter_request_delay_seconds: f64,

    /// Replace the document's declared base URL for every endpoint
    pub base_url_override: Option<String>,

    /// Timeout for fetching the API document
    pub fetch_timeout_seconds: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            method_allow_list: None,
            include_delete: false,
            limit: None,
            skip_probing: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            inter_request_delay_seconds: DEFAULT_INTER_REQUEST_DELAY_SECONDS,
            base_url_override: None,
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECONDS,
        }
    }
}

impl RunConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Negative or non-finite delays are treated as zero.
    pub fn inter_request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.inter_request_delay_seconds).unwrap_or(Duration::ZERO)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}
