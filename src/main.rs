//! AgentDesk - command-line client for the agent backend
//!
#![doc = "AgentDesk - command-line client for the agent backend"]
#![doc = "Main entry point for the AgentDesk application."]

use anyhow::Result;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use agentdesk::cli::{Cli, Commands};
use agentdesk::commands;
use agentdesk::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Health => {
            tracing::info!("Checking backend health");
            commands::health::check_health(&config).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::info!("Starting session command");
            commands::sessions::handle_sessions(&config, command).await?;
            Ok(())
        }
        Commands::Files { command } => {
            tracing::info!("Starting workspace command");
            commands::files::handle_files(&config, command).await?;
            Ok(())
        }
        Commands::Settings { command } => {
            tracing::info!("Starting settings command");
            commands::settings::handle_settings(&config, command).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flag.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose {
        "agentdesk=debug"
    } else {
        "agentdesk=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
