use crate::client::BackendClient;
use crate::commands::backend;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;

/// Handle the health command
pub async fn check_health(config: &Config) -> Result<()> {
    let client = backend(config)?;
    let health = client.health().await?;

    let version = health.version.as_deref().unwrap_or("unknown");
    println!(
        "Backend {} is {} (version {})",
        client.base_url().as_str().cyan(),
        health.status.green(),
        version
    );
    Ok(())
}
