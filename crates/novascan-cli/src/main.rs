mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "novascan")]
#[command(about = "NovaScan post enrichment command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print sentiment, quality metrics and domain for a piece of text
    Analyze {
        #[arg(long)]
        text: String,
    },
    /// Annotate posts from a JSON file and run the enrichment pipeline offline
    Process {
        /// JSON array of raw posts
        #[arg(long)]
        input: PathBuf,

        /// Rank results against this query
        #[arg(long)]
        query: Option<String>,

        /// Composite quality threshold, overriding `NOVASCAN_MIN_QUALITY`
        #[arg(long)]
        min_quality: Option<f64>,

        /// JSON file of search filters applied to the pipeline output
        #[arg(long)]
        filters: Option<PathBuf>,
    },
    /// Run a full collection cycle: fetch, enrich, embed and store
    Collect {
        /// JSON array of raw posts; repeat to use several sources
        #[arg(long, required = true)]
        input: Vec<PathBuf>,

        #[arg(long)]
        query: String,
    },
    /// Print the effective heuristic tables as YAML
    Heuristics,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = novascan_core::load_app_config()?;
    init_tracing(&config.log_level);
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Some(Commands::Analyze { text }) => commands::run_analyze(&config, &text)?,
        Some(Commands::Process {
            input,
            query,
            min_quality,
            filters,
        }) => commands::run_process(
            &config,
            &input,
            query.as_deref(),
            min_quality,
            filters.as_deref(),
        )?,
        Some(Commands::Collect { input, query }) => {
            commands::run_collect(&config, input, &query).await?;
        }
        Some(Commands::Heuristics) => commands::run_heuristics(&config)?,
        None => println!("novascan: no command given, see --help"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
