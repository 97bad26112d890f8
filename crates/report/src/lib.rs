//! HTML and CSV report rendering for api-survey
//!
//! Renders the final endpoint records through embedded `tera` templates.
//! Writers only read the records; probing has finished by the time a
//! [`ReportGenerator`] sees them.

mod naming;
pub mod templates;

pub use naming::{output_name, DEFAULT_OUTPUT_NAME};

use api_survey_common::{ApiInfo, EndpointRecord, ProbeStatus, Result, SurveyError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use tracing::debug;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Format a response size for display ("/" when there is no successful body)
pub fn format_length(status: &ProbeStatus) -> String {
    match status.body_length() {
        None => "/".to_string(),
        Some(len) if len < KIB => len.to_string(),
        Some(len) if len < MIB => format!("{:.1}K", len as f64 / KIB as f64),
        Some(len) => format!("{:.1}M", len as f64 / MIB as f64),
    }
}

/// CSS class used to color a status cell
pub fn status_class(status: &ProbeStatus) -> &'static str {
    match status {
        ProbeStatus::NotRequested => "status-skipped",
        ProbeStatus::Success { .. } => "status-success",
        ProbeStatus::Redirect { .. } => "status-redirect",
        ProbeStatus::ClientError { .. } => "status-client-error",
        ProbeStatus::ServerError { .. } => "status-server-error",
        ProbeStatus::Unexpected { .. } => "status-unexpected",
        ProbeStatus::Timeout | ProbeStatus::ConnectionError => "status-failed",
    }
}

/// Only http(s) URLs from the document are rendered as links
fn is_http_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

/// One table row as the templates see it
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    index: usize,
    method: &'static str,
    path: &'a str,
    full_url: &'a str,
    linkable: bool,
    status: String,
    status_class: &'static str,
    length: String,
    name: &'a str,
    description: &'a str,
    tags: String,
}

impl<'a> ReportRow<'a> {
    fn new(index: usize, record: &'a EndpointRecord) -> Self {
        Self {
            index,
            method: record.method.as_str(),
            path: &record.path,
            full_url: &record.full_url,
            linkable: is_http_url(&record.full_url),
            status: record.probe_status.label(),
            status_class: status_class(&record.probe_status),
            length: format_length(&record.probe_status),
            name: record.display_name(),
            description: &record.description,
            tags: record.tags.join("; "),
        }
    }
}

/// Per-status totals shown in the report header
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub skipped: usize,
    pub success: usize,
    pub redirect: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub unexpected: usize,
    pub failed: usize,
}

impl StatusCounts {
    /// Count records by probe outcome
    pub fn from_records(records: &[EndpointRecord]) -> Self {
        let mut counts = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.probe_status {
                ProbeStatus::NotRequested => counts.skipped += 1,
                ProbeStatus::Success { .. } => counts.success += 1,
                ProbeStatus::Redirect { .. } => counts.redirect += 1,
                ProbeStatus::ClientError { .. } => counts.client_error += 1,
                ProbeStatus::ServerError { .. } => counts.server_error += 1,
                ProbeStatus::Unexpected { .. } => counts.unexpected += 1,
                ProbeStatus::Timeout | ProbeStatus::ConnectionError => counts.failed += 1,
            }
        }
        counts
    }

    /// Number of records that were actually requested
    pub fn probed(&self) -> usize {
        self.total - self.skipped
    }
}

/// Paths of the files written by [`ReportGenerator::write_to_directory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub html: PathBuf,
    pub csv: PathBuf,
}

/// Report generator
///
/// Transforms the final endpoint records into:
/// - `<name>.html` (standalone page with summary and endpoint table)
/// - `<name>.csv` (one row per endpoint)
pub struct ReportGenerator<'a> {
    info: &'a ApiInfo,
    records: &'a [EndpointRecord],
    document_url: Option<&'a str>,
    generated_at: String,
    tera: Tera,
}

impl<'a> ReportGenerator<'a> {
    /// Create a new report generator over the final records
    pub fn new(info: &'a ApiInfo, records: &'a [EndpointRecord]) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self {
            info,
            records,
            document_url: None,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            tera,
        })
    }

    /// Show the document URL in the HTML header
    pub fn with_document_url(mut self, url: &'a str) -> Self {
        self.document_url = Some(url);
        self
    }

    /// Override the generation timestamp
    pub fn with_timestamp(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }

    /// Render the HTML report
    pub fn render_html(&self) -> Result<String> {
        let context = self.create_context();
        self.tera
            .render(templates::HTML_TEMPLATE, &context)
            .map_err(|e| SurveyError::Report(format!("Template error: {:?}", e)))
    }

    /// Render the CSV export
    pub fn render_csv(&self) -> Result<String> {
        let context = self.create_context();
        self.tera
            .render(templates::CSV_TEMPLATE, &context)
            .map_err(|e| SurveyError::Report(format!("Template error: {:?}", e)))
    }

    /// Write `<name>.html` and `<name>.csv` into `output_dir`
    pub fn write_to_directory(&self, output_dir: &Path, name: &str) -> Result<ReportPaths> {
        fs::create_dir_all(output_dir)?;

        let paths = ReportPaths {
            html: output_dir.join(format!("{}.html", name)),
            csv: output_dir.join(format!("{}.csv", name)),
        };

        fs::write(&paths.html, self.render_html()?)?;
        debug!(path = %paths.html.display(), "wrote HTML report");

        fs::write(&paths.csv, self.render_csv()?)?;
        debug!(path = %paths.csv.display(), "wrote CSV report");

        Ok(paths)
    }

    /// Create template context from the records
    fn create_context(&self) -> tera::Context {
        let rows: Vec<ReportRow<'_>> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| ReportRow::new(i + 1, record))
            .collect();
        let counts = StatusCounts::from_records(self.records);

        let mut context = tera::Context::new();
        context.insert("info", self.info);
        context.insert("document_url", &self.document_url);
        context.insert("generated_at", &self.generated_at);
        context.insert("counts", &counts);
        context.insert("probed", &counts.probed());
        context.insert("rows", &rows);
        context
    }
}
