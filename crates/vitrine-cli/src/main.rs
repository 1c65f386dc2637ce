mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vitrine")]
#[command(about = "Static-site catalog pipeline: CSV sources in, JSON artifact out")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the source CSVs, build the catalog tree, and write the artifact
    /// plus the build-health report.
    Build {
        /// Print counts without writing anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Attach drive preview listings to products in the existing artifact.
    Previews {
        /// Concurrent listings per group; 1 or less selects the sequential
        /// variant. Defaults to VITRINE_BATCH_SIZE.
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Attach mirror-log videos to products in the existing artifact.
    Videos,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = vitrine_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build { dry_run } => commands::run_build(&config, dry_run).await,
        Commands::Previews { batch_size } => {
            let batch_size = batch_size.unwrap_or(config.batch_size);
            commands::run_previews(&config, batch_size).await
        }
        Commands::Videos => commands::run_videos(&config).await,
    }
}
