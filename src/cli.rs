//! Command-line interface definition for AgentDesk
//!
//! This module defines the CLI structure using clap's derive API. The CLI is
//! the shell that composes the session, workspace and settings controllers.

use clap::{Parser, Subcommand};

/// AgentDesk - manage agent sessions, workspace files and LLM providers
#[derive(Parser, Debug, Clone)]
#[command(name = "agentdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "AGENTDESK_CONFIG")]
    pub config: Option<String>,

    /// Override the backend base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for AgentDesk
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check that the backend is reachable
    Health,

    /// Manage conversation sessions
    Sessions {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Browse the server-side workspace
    Files {
        /// Workspace subcommand
        #[command(subcommand)]
        command: FilesCommand,
    },

    /// Read and change the LLM provider settings
    Settings {
        /// Settings subcommand
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List saved sessions
    List,

    /// Save the current session and start a new one
    New,

    /// Load a saved session into the agents' memory
    Load {
        /// Session identifier (YYYY-MM-DD_HH-MM-SS)
        id: String,
    },

    /// Show the stored messages of a session
    Show {
        /// Session identifier
        id: String,
    },

    /// Delete a saved session
    Delete {
        /// Session identifier
        id: String,

        /// Answer yes to the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Save the agents' current memory as a session
    Save,

    /// Clear the agents' memory without saving
    Clear,

    /// Show the agents and memory sizes of the current session
    Info,
}

/// Workspace browser subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FilesCommand {
    /// List a workspace directory
    Ls {
        /// Directory relative to the workspace root
        #[arg(default_value = "")]
        path: String,
    },

    /// Print a text file (binary files are downloaded instead)
    View {
        /// File path relative to the workspace root
        path: String,

        /// Directory downloads are written to
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Download a file
    Download {
        /// File path relative to the workspace root
        path: String,

        /// Directory downloads are written to
        #[arg(short, long)]
        out: Option<String>,
    },
}

/// Provider settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Show the backend's provider settings
    Show,

    /// Probe a provider and list the models it serves
    Check {
        /// Provider name to probe instead of the saved one
        #[arg(short, long)]
        provider: Option<String>,

        /// Server address to probe instead of the saved one
        #[arg(short, long)]
        address: Option<String>,
    },

    /// Change provider settings and save them on the backend
    Set {
        /// Provider name (ollama, lm-studio, server, openai, ...)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model name
        #[arg(short, long)]
        model: Option<String>,

        /// Provider server address
        #[arg(short, long)]
        address: Option<String>,

        /// Whether the provider runs locally
        #[arg(short, long)]
        local: Option<bool>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
