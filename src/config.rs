//! Configuration management for AgentDesk
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! The resulting [`Config`] is passed explicitly to every backend client;
//! nothing reads the backend address from process-wide state.

use crate::error::{AgentDeskError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for AgentDesk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Workspace browser settings
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the agent backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional per-request timeout in seconds
    ///
    /// Unset means no client-side timeout; failures then surface only through
    /// transport-level errors.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:7777".to_string()
}

fn default_user_agent() -> String {
    format!("agentdesk/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Workspace browser configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkspaceConfig {
    /// Directory downloads are written to
    ///
    /// Falls back to the user's download directory, then the current directory.
    #[serde(default)]
    pub download_dir: Option<String>,
}

impl WorkspaceConfig {
    /// Resolve the directory downloads should land in
    pub fn resolved_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return PathBuf::from(dir);
        }

        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AgentDeskError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| AgentDeskError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("AGENTDESK_BACKEND_URL") {
            self.backend.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("AGENTDESK_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.backend.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid AGENTDESK_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(dir) = std::env::var("AGENTDESK_DOWNLOAD_DIR") {
            self.workspace.download_dir = Some(dir);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            tracing::debug!("Using backend override from CLI: {}", base_url);
            self.backend.base_url = base_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an absolute http(s) URL or the
    /// timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(AgentDeskError::Config("backend.base_url cannot be empty".to_string()).into());
        }

        let url = url::Url::parse(&self.backend.base_url).map_err(|e| {
            AgentDeskError::Config(format!(
                "Invalid backend.base_url '{}': {}",
                self.backend.base_url, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AgentDeskError::Config(format!(
                "backend.base_url must use http or https, got: {}",
                url.scheme()
            ))
            .into());
        }

        if self.backend.timeout_seconds == Some(0) {
            return Err(AgentDeskError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn cli_without_overrides() -> crate::cli::Cli {
        crate::cli::Cli {
            config: None,
            base_url: None,
            verbose: false,
            json_logs: false,
            command: crate::cli::Commands::Health,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:7777");
        assert_eq!(config.backend.timeout_seconds, None);
        assert!(config.backend.user_agent.starts_with("agentdesk/"));
        assert!(config.workspace.download_dir.is_none());
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_empty_url() {
        let mut config = Config::default();
        config.backend.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.backend.base_url = "ftp://backend.local".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_config_validation_rejects_relative_url() {
        let mut config = Config::default();
        config.backend.base_url = "backend:7777/api".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.backend.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
backend:
  base_url: http://10.0.0.5:7777
  timeout_seconds: 15
workspace:
  download_dir: /tmp/downloads
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:7777");
        assert_eq!(config.backend.timeout_seconds, Some(15));
        assert_eq!(
            config.workspace.resolved_download_dir(),
            PathBuf::from("/tmp/downloads")
        );
        assert!(config.backend.user_agent.starts_with("agentdesk/"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("workspace: {}\n").unwrap();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:7777");
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        std::env::remove_var("AGENTDESK_BACKEND_URL");
        let config = Config::load("nonexistent.yaml", &cli_without_overrides()).unwrap();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:7777");
    }

    #[test]
    #[serial]
    fn test_load_reads_file() {
        std::env::remove_var("AGENTDESK_BACKEND_URL");
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "backend:\n  base_url: http://backend.internal:9000\n").unwrap();

        let config = Config::load(path.to_str().unwrap(), &cli_without_overrides()).unwrap();
        assert_eq!(config.backend.base_url, "http://backend.internal:9000");
    }

    #[test]
    #[serial]
    fn test_env_vars_override_file() {
        std::env::set_var("AGENTDESK_BACKEND_URL", "http://env-host:7777");
        std::env::set_var("AGENTDESK_TIMEOUT_SECONDS", "20");
        std::env::set_var("AGENTDESK_DOWNLOAD_DIR", "/tmp/agentdesk-dl");

        let config = Config::load("nonexistent.yaml", &cli_without_overrides()).unwrap();

        std::env::remove_var("AGENTDESK_BACKEND_URL");
        std::env::remove_var("AGENTDESK_TIMEOUT_SECONDS");
        std::env::remove_var("AGENTDESK_DOWNLOAD_DIR");

        assert_eq!(config.backend.base_url, "http://env-host:7777");
        assert_eq!(config.backend.timeout_seconds, Some(20));
        assert_eq!(
            config.workspace.download_dir,
            Some("/tmp/agentdesk-dl".to_string())
        );
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_env_is_ignored() {
        std::env::set_var("AGENTDESK_TIMEOUT_SECONDS", "soon");
        let config = Config::load("nonexistent.yaml", &cli_without_overrides()).unwrap();
        std::env::remove_var("AGENTDESK_TIMEOUT_SECONDS");

        assert_eq!(config.backend.timeout_seconds, None);
    }

    #[test]
    #[serial]
    fn test_cli_override_wins_over_env() {
        std::env::set_var("AGENTDESK_BACKEND_URL", "http://env-host:7777");
        let mut cli = cli_without_overrides();
        cli.base_url = Some("http://cli-host:7777".to_string());

        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        std::env::remove_var("AGENTDESK_BACKEND_URL");

        assert_eq!(config.backend.base_url, "http://cli-host:7777");
    }
}
