//! @ai:module:intent CLI for the evalkit evaluation harness
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use evalkit::{
    config::{HarnessConfig, DEFAULT_CONFIG_FILE},
    metrics::{OutcomeStatus, ResultSet},
    Evaluation,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "evalkit")]
#[command(about = "Run every benchmark unit against a language model and report scores")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Model identifier, e.g. gpt2-small, gpt4, gpt-4o, claude-3-5-sonnet-latest.
    /// The literal values `list` and `init` are read as subcommands, not models
    model: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing benchmark units
    #[arg(long)]
    benchmarks_dir: Option<PathBuf>,

    /// Output directory for results
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Validate benchmark wiring without calling any model
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered benchmark units
    List {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory containing benchmark units
        #[arg(long)]
        benchmarks_dir: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("evalkit=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List {
            config,
            benchmarks_dir,
        }) => list_benchmarks(config, benchmarks_dir),
        Some(Commands::Init { output }) => init_config(output),
        None => {
            let model = cli
                .model
                .context("A model identifier is required (see --help)")?;

            run_evaluation(RunArgs {
                model,
                config: cli.config,
                benchmarks_dir: cli.benchmarks_dir,
                results_dir: cli.results_dir,
                dry_run: cli.dry_run,
            })
            .await
        }
    }
}

struct RunArgs {
    model: String,
    config: Option<PathBuf>,
    benchmarks_dir: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    dry_run: bool,
}

/// @ai:intent Evaluate one model over every benchmark unit
/// @ai:effects network, fs:read, fs:write
async fn run_evaluation(args: RunArgs) -> Result<()> {
    let mut config = HarnessConfig::load_or_default(args.config.as_deref())?;

    if let Some(dir) = args.benchmarks_dir {
        config.paths.benchmarks_dir = dir;
    }
    if let Some(dir) = args.results_dir {
        config.paths.results_dir = dir;
    }

    let report = Evaluation::new(config)
        .dry_run(args.dry_run)
        .run(&args.model)
        .await?;

    print_summary(&report.results);
    println!("Results saved to {}", report.paths.csv.display());

    Ok(())
}

/// @ai:intent Print summary to console
/// @ai:effects io
fn print_summary(results: &ResultSet) {
    let summary = results.summary();

    println!();
    println!("Evaluation Results: {}", results.model);
    println!("{}", "=".repeat(60));
    println!();
    println!("{:<30} {:>10}  {}", "Benchmark", "Score", "Status");
    println!("{}", "-".repeat(60));

    for outcome in &results.outcomes {
        let status = match &outcome.status {
            OutcomeStatus::Completed => "ok".to_string(),
            OutcomeStatus::Failed { reason } => format!("FAILED: {}", reason),
        };
        println!("{:<30} {:>10.1}  {}", outcome.name, outcome.score, status);
    }

    println!("{}", "-".repeat(60));
    println!(
        "{:<30} {:>10.1}  {} completed, {} failed",
        "Mean", summary.mean_score, summary.completed, summary.failed
    );

    if summary.failed_generations > 0 {
        println!(
            "{} of {} generations returned no result",
            summary.failed_generations, summary.generations
        );
    }

    println!();
}

/// @ai:intent List discovered units with their kind and any malformed reason
/// @ai:effects fs:read
fn list_benchmarks(config_path: Option<PathBuf>, benchmarks_dir: Option<PathBuf>) -> Result<()> {
    let mut config = HarnessConfig::load_or_default(config_path.as_deref())?;

    if let Some(dir) = benchmarks_dir {
        config.paths.benchmarks_dir = dir;
    }

    let evaluation = Evaluation::new(config);
    let units = evaluation.discover()?;

    println!(
        "Benchmark units in {} ({}):",
        evaluation.config().paths.benchmarks_dir.display(),
        units.len()
    );
    println!();
    println!("{:<30} {:<14} {}", "Name", "Kind", "Status");
    println!("{}", "-".repeat(70));

    for unit in &units {
        let status = match unit.malformed_reason() {
            None => unit.description.clone().unwrap_or_else(|| "ready".to_string()),
            Some(reason) => format!("MALFORMED: {}", reason),
        };

        println!(
            "{:<30} {:<14} {}",
            unit.name,
            unit.kind.as_deref().unwrap_or("-"),
            status
        );
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = HarnessConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}
