//! End-to-end survey pipeline
//!
//! fetch → normalize → select → probe, driven by one [`RunConfig`]. Fetch and
//! normalization failures abort before any record exists; probe failures are
//! stored on the records.

use crate::fetch::DocumentSource;
use crate::filter::select_for;
use crate::harness::{Interrupt, ProbeHarness, ProbeOptions, ProbeProgress, ProbeSummary};
use crate::transport::Transport;
use api_survey_common::{ApiInfo, EndpointRecord, Result, RunConfig};
use api_survey_parser::{DocumentVersion, NormalizedDocument, Normalizer};
use tracing::info;

/// Everything the report writers need
#[derive(Debug, Clone)]
pub struct SurveyOutcome {
    /// URL the document was fetched from
    pub document_url: String,

    pub version: DocumentVersion,
    pub info: ApiInfo,

    /// All endpoints, probed or not, in declaration order
    pub records: Vec<EndpointRecord>,

    /// `None` when probing was skipped
    pub summary: Option<ProbeSummary>,
}

/// Pipeline milestones reported to the caller
#[derive(Debug)]
pub enum SurveyEvent<'a> {
    Fetched,
    Normalized {
        version: DocumentVersion,
        endpoints: usize,
    },
    ProbingSkipped,
    Selected {
        eligible: usize,
        total: usize,
    },
    Probed(ProbeProgress<'a>),
}

/// Run a complete survey of the document at `url`
pub async fn run_survey<S, T, F>(
    url: &str,
    source: &S,
    transport: &T,
    config: &RunConfig,
    interrupt: &Interrupt,
    mut on_event: F,
) -> Result<SurveyOutcome>
where
    S: DocumentSource + ?Sized,
    T: Transport + ?Sized,
    F: FnMut(SurveyEvent<'_>),
{
    info!(%url, "fetching API document");
    let document = source.fetch(url).await?;
    on_event(SurveyEvent::Fetched);

    let mut normalizer = Normalizer::new().with_document_url(url);
    if let Some(base_url) = &config.base_url_override {
        normalizer = normalizer.with_base_url_override(base_url.clone());
    }
    let NormalizedDocument {
        version,
        info,
        mut records,
    } = normalizer.normalize_document(&document)?;
    info!(
        version = version.as_str(),
        endpoints = records.len(),
        "normalized API document"
    );
    on_event(SurveyEvent::Normalized {
        version,
        endpoints: records.len(),
    });

    let summary = if config.skip_probing {
        on_event(SurveyEvent::ProbingSkipped);
        None
    } else {
        let selection = select_for(&records, config);
        on_event(SurveyEvent::Selected {
            eligible: selection.len(),
            total: records.len(),
        });

        let harness = ProbeHarness::new(transport, ProbeOptions::from_config(config))
            .with_interrupt(interrupt.clone());
        let summary = harness
            .run(&mut records, &selection, |progress| {
                on_event(SurveyEvent::Probed(progress))
            })
            .await;
        Some(summary)
    };

    Ok(SurveyOutcome {
        document_url: url.to_string(),
        version,
        info,
        records,
        summary,
    })
}
