use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use weatherverse::cli::Cli;

const DEFAULT_LOG_FILTER: &str = "weatherverse=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    weatherverse::run(cli).await
}
