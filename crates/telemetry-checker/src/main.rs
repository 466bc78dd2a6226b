use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use telemetry_checker::{cli::OutputFormat, ingestor, server, settings::Settings};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "telemetry-checker",
    about = "Regional telemetry aggregation service",
    version,
    after_help = r#"Configuration:
    Configuration can be provided via:
    1. Environment variables with TELEM__ prefix (e.g., TELEM__SERVER__ADDR)
    2. .env file in the current directory
    3. Config file with -c option

Examples:
    # Serve the aggregation API on the configured address
    telemetry-checker serve

    # Serve on an explicit address with a specific dataset
    telemetry-checker -d /srv/telemetry.json serve --addr 0.0.0.0:9000

    # One-shot aggregation from the command line
    telemetry-checker check --threshold-ms 150 apac emea"#
)]
pub struct Cli {
    /// Path to the configuration file (TOML format)
    ///
    /// If not provided, will attempt to load from environment variables
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Telemetry dataset file, tried before the configured candidates
    #[clap(short = 'd', long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP aggregation service
    Serve {
        /// Listen address, overrides the configured one
        #[clap(long, value_name = "ADDR")]
        addr: Option<SocketAddr>,
    },
    /// Compute region metrics once and print them
    Check {
        /// Latency threshold in milliseconds for breach counting
        #[clap(long, value_name = "MS")]
        threshold_ms: f64,

        /// Output format
        #[clap(long, value_enum, default_value_t = OutputFormat::Table)]
        output_format: OutputFormat,

        /// Regions to aggregate
        #[clap(required = true, value_name = "REGION")]
        regions: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let settings = if let Some(config_path) = &self.config {
            Settings::from_path(config_path)?
        } else {
            Settings::from_env()?
        };
        init_logging(&settings.log_level)?;
        debug!("{settings}");

        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = &self.dataset {
            candidates.push(path.clone());
        }
        candidates.extend(settings.dataset.paths.iter().map(PathBuf::from));
        let records = ingestor::load_dataset(&candidates)?;

        match self.command {
            Commands::Serve { addr } => {
                let addr = addr.unwrap_or(settings.server.addr);
                server::serve(addr, Arc::new(records), settings.aggregation.percentile).await
            }
            Commands::Check {
                threshold_ms,
                output_format,
                regions,
            } => {
                let rendered = telemetry_checker::cli::handle_check(
                    &records,
                    &regions,
                    threshold_ms,
                    settings.aggregation.percentile,
                    output_format,
                )?;
                println!("{rendered}");
                Ok(())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}

fn init_logging(log_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
