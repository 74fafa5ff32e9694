mod scrape;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lotscan")]
#[command(about = "Extract vehicle inventory from car-dealer pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one dealer page and print the result as JSON
    Scrape {
        /// Page to scrape
        url: String,
        /// Page-load timeout in milliseconds, clamped to 5000..=180000
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Also print the stage trail and failure diagnostics to stderr
        #[arg(long)]
        report: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = lotscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape {
            url,
            timeout_ms,
            report,
        } => scrape::run_scrape(&config, &url, timeout_ms, report).await,
    }
}
