use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use regional_jobs_monitor::config::{self, AppConfig};
use regional_jobs_monitor::eligibility::{Postcode, RuleSet};
use regional_jobs_monitor::error::AppError;
use regional_jobs_monitor::listings::FixtureSource;
use regional_jobs_monitor::pipeline::JobsPipeline;
use regional_jobs_monitor::report::{self, JobsArtifact};
use regional_jobs_monitor::telemetry;

const DEFAULT_RULES_FILE: &str = "rules/eligibility-462.json";
const DEFAULT_FIXTURES_FILE: &str = "fixtures/listings.json";
const DEFAULT_OUT_FILE: &str = "data/jobs-last10d.json";

#[derive(Parser, Debug)]
#[command(
    name = "Regional Jobs Monitor",
    about = "Count recent 462-eligible job listings per Australian postal area",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the eligibility pipeline against recorded listings (default command)
    Fetch(FetchArgs),
    /// Render a previously written jobs artifact
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Eligibility rule document
    #[arg(long, default_value = DEFAULT_RULES_FILE)]
    rules: PathBuf,
    /// Recorded listings replayed as the job-board backend
    #[arg(long, default_value = DEFAULT_FIXTURES_FILE)]
    fixtures: PathBuf,
    /// Output artifact path
    #[arg(long, default_value = DEFAULT_OUT_FILE)]
    out: PathBuf,
    /// Override the recency window in days
    #[arg(long)]
    window_days: Option<u32>,
    /// Comma-separated postal area allowlist, overriding LIMIT_POAS
    #[arg(long)]
    limit_poas: Option<String>,
    /// Print the per-POA summary after writing the artifact
    #[arg(long)]
    summary: bool,
}

impl Default for FetchArgs {
    fn default() -> Self {
        Self {
            rules: PathBuf::from(DEFAULT_RULES_FILE),
            fixtures: PathBuf::from(DEFAULT_FIXTURES_FILE),
            out: PathBuf::from(DEFAULT_OUT_FILE),
            window_days: None,
            limit_poas: None,
            summary: false,
        }
    }
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Artifact produced by a fetch run
    #[arg(long, default_value = DEFAULT_OUT_FILE)]
    artifact: PathBuf,
    /// Optional CSV export of per-POA counts
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Include each qualifying job in the output
    #[arg(long)]
    list_jobs: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Fetch(FetchArgs::default()));

    match command {
        Command::Fetch(args) => run_fetch(args).await,
        Command::Report(args) => run_report(args),
    }
}

async fn run_fetch(args: FetchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let window_days = args.window_days.unwrap_or(config.run.window_days);
    let limit_poas: Vec<Postcode> = match args.limit_poas.as_deref() {
        Some(raw) => config::parse_poa_list(raw)?,
        None => config.run.limit_poas.clone(),
    };

    let rules = RuleSet::load(&args.rules)?;
    let source = FixtureSource::from_path(&args.fixtures)?.with_page_limit(config.run.max_pages);
    let pipeline = JobsPipeline::new(rules, Arc::new(source), window_days);

    let artifact = pipeline.run(&limit_poas).await;
    report::write_artifact_or_fallback(&args.out, &artifact)?;
    info!(
        out = %args.out.display(),
        poas = artifact.per_poa.len(),
        jobs = artifact.total_jobs(),
        "artifact written"
    );

    if args.summary {
        report::render_summary(&artifact, false);
    }
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let artifact = JobsArtifact::load(&args.artifact)?;
    report::render_summary(&artifact, args.list_jobs);

    if let Some(csv_path) = args.csv {
        let file = std::fs::File::create(&csv_path)?;
        report::write_counts_csv(file, &artifact)?;
        println!("\nCounts exported to {}", csv_path.display());
    }
    Ok(())
}
