//! Sequential probe harness
//!
//! Probes the selected records one at a time, in selection order. Each
//! request is awaited to completion (or timeout) before the next is issued,
//! and the configured delay is slept between requests so the delay is a
//! reliable throttle regardless of target latency.
//!
//! Cancellation is cooperative: the [`Interrupt`] flag is checked before each
//! request, never mid-request. When it is set, the harness returns what it
//! has; records it did not reach keep `NotRequested`.

use crate::filter::Selection;
use crate::transport::{ProbeRequest, ProbeResponse, Transport, TransportError};
use api_survey_common::{
    EndpointRecord, ProbeStatus, RunConfig, DEFAULT_INTER_REQUEST_DELAY_SECONDS,
    DEFAULT_TIMEOUT_SECONDS,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Timing policy for a probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Hard per-request timeout
    pub timeout: Duration,

    /// Pause after each probe except the last
    pub delay: Duration,
}

impl ProbeOptions {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            timeout: config.timeout(),
            delay: config.inter_request_delay(),
        }
    }
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            delay: Duration::from_secs_f64(DEFAULT_INTER_REQUEST_DELAY_SECONDS),
        }
    }
}

/// Cooperative cancellation flag shared with a signal listener
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lifecycle of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeState {
    Pending,
    Requesting,
    Finished(ProbeStatus),
}

impl ProbeState {
    fn start(self) -> Self {
        match self {
            ProbeState::Pending => ProbeState::Requesting,
            other => other,
        }
    }

    fn finish(self, outcome: Result<ProbeResponse, TransportError>) -> Self {
        match self {
            ProbeState::Requesting => ProbeState::Finished(classify(outcome)),
            other => other,
        }
    }

    fn status(self) -> ProbeStatus {
        match self {
            ProbeState::Finished(status) => status,
            ProbeState::Pending | ProbeState::Requesting => ProbeStatus::NotRequested,
        }
    }
}

/// Map a transport outcome to a [`ProbeStatus`]
pub fn classify(outcome: Result<ProbeResponse, TransportError>) -> ProbeStatus {
    match outcome {
        Ok(ProbeResponse {
            status,
            body_length,
        }) => match status {
            200..=299 => ProbeStatus::Success {
                code: status,
                body_length,
            },
            300..=399 => ProbeStatus::Redirect { code: status },
            400..=499 => ProbeStatus::ClientError { code: status },
            500..=599 => ProbeStatus::ServerError { code: status },
            _ => ProbeStatus::Unexpected { code: status },
        },
        Err(TransportError::Timeout) => ProbeStatus::Timeout,
        Err(TransportError::Connection(_)) => ProbeStatus::ConnectionError,
    }
}

/// Counts for a finished probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeSummary {
    /// Records chosen by the filter
    pub selected: usize,

    /// Requests actually issued
    pub attempted: usize,

    pub success: usize,
    pub redirect: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub unexpected: usize,
    pub timeout: usize,
    pub connection_error: usize,

    /// The run stopped early because of an interrupt
    pub interrupted: bool,
}

impl ProbeSummary {
    fn tally(&mut self, status: ProbeStatus) {
        self.attempted += 1;
        match status {
            ProbeStatus::Success { .. } => self.success += 1,
            ProbeStatus::Redirect { .. } => self.redirect += 1,
            ProbeStatus::ClientError { .. } => self.client_error += 1,
            ProbeStatus::ServerError { .. } => self.server_error += 1,
            ProbeStatus::Unexpected { .. } => self.unexpected += 1,
            ProbeStatus::Timeout => self.timeout += 1,
            ProbeStatus::ConnectionError => self.connection_error += 1,
            ProbeStatus::NotRequested => {}
        }
    }
}

/// Progress notification emitted after each probe
#[derive(Debug, Clone, Copy)]
pub struct ProbeProgress<'a> {
    /// 1-based position within the selection
    pub position: usize,
    pub total: usize,
    pub record: &'a EndpointRecord,
}

/// Drives sequential probing over a [`Transport`]
pub struct ProbeHarness<'a, T: Transport + ?Sized> {
    transport: &'a T,
    options: ProbeOptions,
    interrupt: Interrupt,
}

impl<'a, T: Transport + ?Sized> ProbeHarness<'a, T> {
    pub fn new(transport: &'a T, options: ProbeOptions) -> Self {
        Self {
            transport,
            options,
            interrupt: Interrupt::new(),
        }
    }

    /// Observe this flag between requests
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Probe every selected record, writing its `probe_status`
    pub async fn run<F>(
        &self,
        records: &mut [EndpointRecord],
        selection: &Selection,
        mut on_progress: F,
    ) -> ProbeSummary
    where
        F: FnMut(ProbeProgress<'_>),
    {
        let total = selection.len();
        let mut summary = ProbeSummary {
            selected: total,
            ..ProbeSummary::default()
        };
        info!(total, "probing endpoints");

        for (offset, &index) in selection.indices().iter().enumerate() {
            if self.interrupt.is_triggered() {
                info!(probed = summary.attempted, total, "probing interrupted");
                summary.interrupted = true;
                break;
            }

            let Some(record) = records.get_mut(index) else {
                continue;
            };

            let request = ProbeRequest {
                method: record.method,
                url: record.full_url.clone(),
            };
            let state = ProbeState::Pending.start();
            let outcome =
                match tokio::time::timeout(self.options.timeout, self.transport.send(request))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(TransportError::Timeout),
                };
            if let Err(TransportError::Connection(reason)) = &outcome {
                debug!(url = %record.full_url, %reason, "transport failure");
            }
            let status = state.finish(outcome).status();

            debug!(
                method = %record.method,
                url = %record.full_url,
                status = %status.label(),
                "probed endpoint"
            );
            record.probe_status = status;
            summary.tally(status);

            on_progress(ProbeProgress {
                position: offset + 1,
                total,
                record,
            });

            if offset + 1 < total && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }
        }

        summary
    }
}

/// Probe the selected records without progress reporting
pub async fn probe<T: Transport + ?Sized>(
    records: &mut [EndpointRecord],
    selection: &Selection,
    transport: &T,
    options: ProbeOptions,
    interrupt: &Interrupt,
) -> ProbeSummary {
    ProbeHarness::new(transport, options)
        .with_interrupt(interrupt.clone())
        .run(records, selection, |_| {})
        .await
}
