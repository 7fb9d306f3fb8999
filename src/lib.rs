//! AgentDesk - client library for a multi-agent assistant backend
//!
//! This library provides the client side of the backend's session, workspace
//! and LLM settings API, together with the view controllers that sit between
//! that API and a user interface.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `client`: `BackendClient` trait, wire types and the reqwest implementation
//! - `controllers`: Session list, workspace browser and provider settings controllers
//! - `confirm` / `download`: Injected capabilities used by the controllers
//! - `format`: Date, time and size labels
//! - `providers`: Static catalog of supported LLM providers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and its handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use agentdesk::{Config, HttpBackendClient, ProviderSettingsController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let client = Arc::new(HttpBackendClient::new(&config.backend)?);
//!     let settings = ProviderSettingsController::new(client);
//!     settings.load_settings().await?;
//!     println!("{}", settings.hint());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod controllers;
pub mod download;
pub mod error;
pub mod format;
pub mod providers;

// Re-export commonly used types
pub use client::{BackendClient, HttpBackendClient};
pub use config::Config;
pub use controllers::{
    ProviderSettingsController, SessionListController, WorkspaceBrowserController,
};
pub use error::{AgentDeskError, Result};
