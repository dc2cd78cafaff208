//! CLI command definitions for routebench.
//!
//! Two run modes against a live routing service: `batch` repeats trials at
//! one sample size, `extended` sweeps a range of sizes. Both print a run
//! summary and optionally write the dataset as CSV.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use crate::client::SolverClient;
use crate::export;
use crate::harness::runner::{BatchRunConfig, ExtendedRunConfig, RunReport, Runner};
use crate::harness::{stats, ALL_ALGORITHMS, BRUTE_FORCE, EXTENDED_MAX_POINTS};

/// Default routing service endpoint (local Flask development server).
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Benchmark harness for a remote TSP routing service.
#[derive(Parser)]
#[command(name = "routebench")]
#[command(about = "Drive repeated sample/solve trials against a TSP routing service")]
#[command(version)]
#[command(
    long_about = "routebench drives a TSP routing service in repeated (sample, solve) trials,\n\
retries degenerate zero-distance rounds, and aggregates validated results.\n\n\
Example usage:\n  routebench batch --points 8 --repeats 10 --output batch_results.csv\n  \
routebench extended --max-points 20 --repeats 5 --output big_test.csv"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run repeated trials at a fixed sample size.
    Batch(BatchArgs),

    /// Sweep sample sizes, repeating trials at each size.
    #[command(alias = "big-test")]
    Extended(ExtendedArgs),
}

/// Arguments for `routebench batch`.
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Base URL of the routing service.
    #[arg(long, env = "ROUTEBENCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of points to sample per trial.
    #[arg(short = 'n', long, default_value = "5")]
    pub points: usize,

    /// Number of repeats.
    #[arg(short, long, default_value = "3")]
    pub repeats: u32,

    /// Comma-separated algorithm names; defaults to all known algorithms.
    #[arg(short, long)]
    pub algos: Option<String>,

    /// Write the collected dataset to this CSV file.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `routebench extended`.
#[derive(Parser, Debug)]
pub struct ExtendedArgs {
    /// Base URL of the routing service.
    #[arg(long, env = "ROUTEBENCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Smallest sample size of the sweep.
    #[arg(long, default_value = "2")]
    pub min_points: usize,

    /// Largest sample size of the sweep.
    #[arg(long, default_value_t = EXTENDED_MAX_POINTS)]
    pub max_points: usize,

    /// Repeats per sample size.
    #[arg(short, long, default_value = "50")]
    pub repeats: u32,

    /// Comma-separated algorithm names; defaults to all known algorithms.
    #[arg(short, long)]
    pub algos: Option<String>,

    /// Write the collected dataset to this CSV file.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Parse CLI arguments from the process environment.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Execute a parsed CLI invocation.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Batch(args) => run_batch(args).await,
        Commands::Extended(args) => run_extended(args).await,
    }
}

async fn run_batch(args: BatchArgs) -> anyhow::Result<()> {
    let algorithms = parse_algorithms(args.algos.as_deref())?;
    let runner = Runner::new(Arc::new(SolverClient::new(args.base_url)));

    let report = runner
        .run_batch(&BatchRunConfig {
            points_n: args.points,
            repeats: args.repeats,
            algorithms,
        })
        .await?;

    summarize(&report);

    if let Some(path) = args.output {
        let text = export::batch_csv(&report.dataset);
        std::fs::write(&path, text)?;
        info!(path = %path.display(), records = report.collected, "Wrote batch CSV");
    }

    Ok(())
}

async fn run_extended(args: ExtendedArgs) -> anyhow::Result<()> {
    let algorithms = parse_algorithms(args.algos.as_deref())?;
    let runner = Runner::new(Arc::new(SolverClient::new(args.base_url)));

    let report = runner
        .run_extended(&ExtendedRunConfig {
            min_points: args.min_points,
            max_points: args.max_points,
            repeats: args.repeats,
            algorithms,
        })
        .await?;

    summarize(&report);

    if let Some(projection) = export::extended_series(&report.dataset).projection {
        let last = projection.points.last();
        info!(
            series = %projection.algorithm,
            points = projection.points.len(),
            projected_max_sec = last.map(|p| p.1),
            "Growth projection available for {}",
            BRUTE_FORCE
        );
    }

    if let Some(path) = args.output {
        let text = export::extended_csv(&report.dataset);
        std::fs::write(&path, text)?;
        info!(path = %path.display(), records = report.collected, "Wrote extended CSV");
    }

    Ok(())
}

/// Print the run-end summary the way the harness promises: collected record
/// counts always, abandonment never hidden.
fn summarize(report: &RunReport) {
    let avg = stats::average_distance_excluding_degenerate_iterations(&report.dataset);
    info!(
        collected = report.collected,
        expected = report.expected,
        abandoned_trials = report.abandoned_trials,
        avg_distance_m = format!("{:.1}", avg),
        finished_at = %report.finished_at,
        "Run summary"
    );
    if !report.complete() {
        warn!(
            missing = report.expected - report.collected,
            "Run completed with partial data"
        );
    }
}

/// Parse a comma-separated algorithm list, defaulting to all known names.
fn parse_algorithms(raw: Option<&str>) -> anyhow::Result<Vec<String>> {
    let Some(raw) = raw else {
        return Ok(ALL_ALGORITHMS.iter().map(|s| s.to_string()).collect());
    };

    let mut algorithms = Vec::new();
    for name in raw.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let Some(known) = ALL_ALGORITHMS.iter().find(|a| a.eq_ignore_ascii_case(name)) else {
            anyhow::bail!(
                "Unknown algorithm '{}'. Known algorithms: {}",
                name,
                ALL_ALGORITHMS.join(", ")
            );
        };
        let known = known.to_string();
        if !algorithms.contains(&known) {
            algorithms.push(known);
        }
    }

    if algorithms.is_empty() {
        anyhow::bail!("No algorithms selected");
    }
    Ok(algorithms)
}
