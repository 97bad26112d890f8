//! api-survey CLI
//!
//! Fetches an OpenAPI/Swagger document, probes its endpoints and writes HTML
//! and CSV reports.

use anyhow::{bail, Context, Result};
use api_survey_common::{
    MethodAllowList, RunConfig, DEFAULT_INTER_REQUEST_DELAY_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
use api_survey_prober::{
    run_survey, HttpDocumentSource, Interrupt, ProbeSummary, ReqwestTransport, SurveyEvent,
    SurveyOutcome,
};
use api_survey_report::{output_name, ReportGenerator, ReportPaths};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "api-survey")]
#[command(
    version,
    about = "Extract endpoints from an OpenAPI/Swagger document, probe them, and export HTML/CSV reports",
    long_about = None
)]
#[command(after_help = "EXAMPLES:\n  \
    # Probe every non-DELETE endpoint\n  \
    api-survey --url https://petstore.swagger.io/v2/swagger.json\n\n  \
    # Only the first 20 GET endpoints, with a slower pace\n  \
    api-survey -u https://api.example.com/openapi.json -m get --limit 20 --delay 0.5\n\n  \
    # Export the endpoint list without sending any probe\n  \
    api-survey -u https://api.example.com/openapi.json --request-none -o ./reports\n\n  \
    # Probe a local deployment of a published document, DELETE included\n  \
    api-survey -u https://api.example.com/openapi.json --base-url http://localhost:8080 --all")]
struct Cli {
    /// URL of the OpenAPI/Swagger JSON document
    #[arg(short, long)]
    url: String,

    /// Probe at most N eligible endpoints
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Include DELETE endpoints when probing
    #[arg(long)]
    all: bool,

    /// Comma-separated methods to probe (e.g., "get,post")
    #[arg(short, long, value_name = "METHODS")]
    method: Option<String>,

    /// Export the endpoint list without sending any probe
    #[arg(long)]
    request_none: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,

    /// Pause between probes in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_INTER_REQUEST_DELAY_SECONDS)]
    delay: f64,

    /// Probe against this base URL instead of the document's servers
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory for the generated reports
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Map command-line flags onto a run configuration
    fn run_config(&self) -> Result<RunConfig> {
        let method_allow_list = match &self.method {
            Some(input) => {
                let (list, invalid) = MethodAllowList::parse(input);
                for method in &invalid {
                    eprintln!("{} Ignoring unknown method: {}", "⚠".yellow(), method);
                }
                if list.is_empty() {
                    bail!("No valid HTTP method in --method {:?}", input);
                }
                Some(list)
            }
            None => None,
        };

        if !self.delay.is_finite() || self.delay < 0.0 {
            bail!("--delay must be a non-negative number of seconds");
        }

        Ok(RunConfig {
            method_allow_list,
            include_delete: self.all,
            limit: self.limit,
            skip_probing: self.request_none,
            timeout_seconds: self.timeout,
            inter_request_delay_seconds: self.delay,
            base_url_override: self.base_url.clone(),
            ..RunConfig::default()
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    let config = cli.run_config()?;
    survey_command(&cli, &config).await
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Exit status after a second Ctrl-C (128 + SIGINT)
const ABORT_EXIT_CODE: i32 = 130;

/// What a Ctrl-C press should do
#[derive(Debug, PartialEq, Eq)]
enum SignalAction {
    /// Finish the current request, then write reports
    Drain,
    /// Already draining: stop immediately
    Abort,
}

fn on_ctrl_c(interrupt: &Interrupt) -> SignalAction {
    if interrupt.is_triggered() {
        SignalAction::Abort
    } else {
        interrupt.trigger();
        SignalAction::Drain
    }
}

/// First Ctrl-C stops probing after the current request, a second one exits
fn listen_for_interrupt(interrupt: Interrupt) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl-C");
                return;
            }
            match on_ctrl_c(&interrupt) {
                SignalAction::Drain => eprintln!(
                    "\n{} Interrupted, finishing the current request and writing reports \
                     (Ctrl-C again to abort)...",
                    "⚠".yellow()
                ),
                SignalAction::Abort => {
                    eprintln!("\n{} Aborted, no reports written", "✗".red());
                    std::process::exit(ABORT_EXIT_CODE);
                }
            }
        }
    });
}

async fn survey_command(cli: &Cli, config: &RunConfig) -> Result<()> {
    println!("{} Fetching API document: {}", "→".cyan(), cli.url);
    if cli.verbose {
        print_config(config);
    }

    let source = HttpDocumentSource::new(config.fetch_timeout())
        .context("Failed to create document client")?;
    let transport =
        ReqwestTransport::new(config.timeout()).context("Failed to create probe client")?;

    let interrupt = Interrupt::new();
    listen_for_interrupt(interrupt.clone());

    let outcome = run_survey(
        &cli.url,
        &source,
        &transport,
        config,
        &interrupt,
        print_event,
    )
    .await
    .with_context(|| format!("Failed to survey {}", cli.url))?;

    if let Some(summary) = &outcome.summary {
        print_summary(summary);
    }

    let paths = write_reports(&outcome, cli)?;

    println!("\n{}", "✓ Survey complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    println!("  📄 {}", paths.html.display());
    println!("  📄 {}", paths.csv.display());

    Ok(())
}

fn print_config(config: &RunConfig) {
    let methods = config
        .method_allow_list
        .as_ref()
        .map(|list| {
            list.methods()
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_else(|| "all".to_string());

    println!("  Methods: {}", methods);
    println!("  Include DELETE: {}", config.include_delete);
    match config.limit {
        Some(limit) => println!("  Limit: {}", limit),
        None => println!("  Limit: none"),
    }
    println!("  Timeout: {}s", config.timeout_seconds);
    println!("  Delay: {}s", config.inter_request_delay_seconds);
    if let Some(base_url) = &config.base_url_override {
        println!("  Base URL: {}", base_url);
    }
}

fn print_event(event: SurveyEvent<'_>) {
    match event {
        SurveyEvent::Fetched => println!("{} Document fetched", "✓".green()),
        SurveyEvent::Normalized { version, endpoints } => println!(
            "{} Found {} endpoints ({})",
            "✓".green(),
            endpoints.to_string().yellow(),
            version.as_str()
        ),
        SurveyEvent::ProbingSkipped => {
            println!("{} Probing skipped (--request-none)", "→".cyan())
        }
        SurveyEvent::Selected { eligible, total } => println!(
            "{} Probing {} of {} endpoints...",
            "→".cyan(),
            eligible,
            total
        ),
        SurveyEvent::Probed(progress) => {
            let record = progress.record;
            let label = record.probe_status.label();
            let status = match record.probe_status.code() {
                Some(code) if code < 300 => label.green(),
                Some(code) if code < 400 => label.cyan(),
                Some(code) if code < 500 => label.yellow(),
                _ => label.red(),
            };
            println!(
                "  [{}/{}] {:<7} {} → {}",
                progress.position,
                progress.total,
                record.method.as_str(),
                record.path,
                status
            );
        }
    }
}

fn print_summary(summary: &ProbeSummary) {
    println!("\n{}", "Probe results:".bold());
    println!("  Requested: {}/{}", summary.attempted, summary.selected);
    println!("  2xx: {}", summary.success.to_string().green());
    println!("  3xx: {}", summary.redirect.to_string().cyan());
    println!("  4xx: {}", summary.client_error.to_string().yellow());
    println!("  5xx: {}", summary.server_error.to_string().red());
    if summary.unexpected > 0 {
        println!("  Other: {}", summary.unexpected);
    }
    println!("  Timeout: {}", summary.timeout);
    println!("  Connection error: {}", summary.connection_error);
    if summary.interrupted {
        println!(
            "{} Interrupted: {} endpoints were not requested",
            "⚠".yellow(),
            summary.selected - summary.attempted
        );
    }
}

fn write_reports(outcome: &SurveyOutcome, cli: &Cli) -> Result<ReportPaths> {
    let name = output_name(&outcome.document_url);
    println!("{} Writing reports...", "→".cyan());

    ReportGenerator::new(&outcome.info, &outcome.records)
        .context("Failed to load report templates")?
        .with_document_url(&outcome.document_url)
        .write_to_directory(&cli.output_dir, &name)
        .with_context(|| format!("Failed to write reports to {}", cli.output_dir.display()))
}
