use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reelstat_analysis::{analyze, Analysis};
use reelstat_common::{load_config, AnalysisConfig, Config};
use reelstat_ingest::load_dataset;

mod export;
mod summary;

#[derive(Parser)]
#[command(name = "reelstat", about = "Cross-platform short-video performer statistics")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the exports, print the summary and write the JSON outputs
    Run(RunArgs),
    /// Print the JSON schema of analysis.json
    Schema,
}

#[derive(Args)]
struct RunArgs {
    /// Directory holding the platform exports (overrides REELSTAT_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for analysis.json, chart_data.json and videos.json (overrides REELSTAT_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// TOML analysis config (overrides REELSTAT_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip writing the JSON outputs
    #[arg(long)]
    no_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    match cli.command {
        Command::Run(args) => run(args),
        Command::Schema => {
            let schema = schemars::schema_for!(Analysis);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

/// Logs go to stderr; stdout carries the summary or the schema.
fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("reelstat=info".parse()?)
        .add_directive("export_reader=info".parse()?);
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(dir) = args.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(path) = args.config {
        config = config.with_config_path(path);
    }
    config.log_summary();

    let analysis_config = match &config.config_path {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    let dataset = load_dataset(&config.data_dir, &analysis_config.files)
        .with_context(|| format!("Failed to load exports from {}", config.data_dir.display()))?;
    let analysis = analyze(&dataset, &analysis_config);

    print!("{}", summary::render_summary(&analysis).context("Failed to render summary")?);

    if args.no_json {
        info!("Skipping JSON outputs");
    } else {
        export::write_outputs(config.output_dir(), &dataset, &analysis)?;
    }
    Ok(())
}
