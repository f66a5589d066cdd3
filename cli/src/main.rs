//! GeoCrop - command line entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geocrop_cli::{execute, Cli, CliError, Config};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geocrop=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().map_err(CliError::from)?;
    tracing::debug!(environment = %config.environment, "Configuration loaded");

    let stdout = std::io::stdout();
    execute(cli, &config, &mut stdout.lock())?;
    Ok(())
}
