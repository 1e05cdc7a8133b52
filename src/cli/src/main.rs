//! CLI for merge-if-green.
//!
//! Walks every repository of an organization, retries CI on dependency-bot
//! pull requests via a retry label, and merges them once every check is green.

use clap::Parser;
use merge_if_green::{
    load_policy, GitHubService, RunSummary, Runner, RunnerConfig, RunnerError,
    DEFAULT_PULL_REQUEST_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// merge-if-green - Retry CI on dependency-bot pull requests and merge them when green.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub organization to scan.
    #[arg(long, env = "ORGANIZATION")]
    organization: String,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    token: String,

    /// Path to a TOML policy file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the retry ceiling from the policy file.
    #[arg(long)]
    max_retries: Option<u32>,

    /// Seconds allowed per pull request before it is recorded as failed.
    #[arg(long, default_value_t = DEFAULT_PULL_REQUEST_TIMEOUT_SECS)]
    pull_request_timeout: u64,

    /// Decide without labeling or merging anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();
    let json = args.json;

    match run(args).await {
        Ok(summary) => {
            if json {
                print_json_summary(&summary);
            } else {
                print_summary(&summary);
            }

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with compact output, filtered by `RUST_LOG`
/// (defaults to "info").
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let policy = load_policy(args.config.as_deref(), args.max_retries)?;
    let forge = GitHubService::new(&args.token)?;
    let config = RunnerConfig::new(args.organization, args.dry_run)
        .with_pull_request_timeout(Duration::from_secs(args.pull_request_timeout));

    Runner::new(config, policy, forge).run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!(
        "  Repositories discovered: {}",
        summary.repositories_discovered
    );
    if summary.repositories_failed > 0 {
        println!("  Repositories failed: {}", summary.repositories_failed);
    }
    println!(
        "  Pull requests evaluated: {}",
        summary.pull_requests_evaluated
    );
    println!("  Retries requested: {}", summary.retries_requested);
    println!("  Waiting on CI: {}", summary.waiting);
    println!("  Given up: {}", summary.given_up);
    println!("  Merged: {}", summary.merged);
    println!("  Skipped: {}", summary.skipped);
    println!("  Anomalies: {}", summary.anomalies);
    println!("  Failures: {}", summary.failures);

    if !summary.dry_run {
        println!("  Actions applied: {}", summary.actions_applied);
    }
}

fn print_json_summary(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to serialize summary"),
    }
}
