/*!
Command handlers for the CLI

Each handler builds an [`HttpBackendClient`] from the loaded configuration,
wraps it in the matching controller and renders the controller's view state
on the terminal.

- `health`: Backend reachability check
- `sessions`: Session list, load, delete, save and clear of the live session
- `files`: Workspace browser
- `settings`: LLM provider settings and connection probe
*/

use crate::client::HttpBackendClient;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use std::sync::Arc;

pub mod files;
pub mod health;
pub mod sessions;
pub mod settings;

/// Build the shared backend client for one command invocation
pub(crate) fn backend(config: &Config) -> Result<Arc<HttpBackendClient>> {
    let client = HttpBackendClient::new(&config.backend)?;
    tracing::debug!("Using backend at {}", client.base_url());
    Ok(Arc::new(client))
}

/// Print a controller's error banner, if one is set
pub(crate) fn print_banner(banner: Option<String>) {
    if let Some(message) = banner {
        eprintln!("{} {}", "Error:".red().bold(), message.red());
    }
}
