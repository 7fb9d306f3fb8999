//! Wire types for the agent backend API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error text the backend uses when a file is not valid UTF-8
pub const BINARY_FILE_ERROR: &str = "Binary file cannot be viewed as text";

/// A saved conversation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier, formatted `YYYY-MM-DD_HH-MM-SS`
    #[serde(rename = "session_id")]
    pub id: String,

    /// First user message, truncated by the backend
    #[serde(default)]
    pub preview: Option<String>,

    /// Number of stored messages
    #[serde(default)]
    pub message_count: u64,

    /// Backing file name on the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Creation stamp, same format as the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Last modification time (epoch seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionListResponse {
    #[serde(default)]
    pub sessions: Vec<Session>,
}

/// Acknowledgment of `POST /sessions/new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    /// Backend status tag, `new_session_created`
    #[serde(default)]
    pub status: String,

    /// Identifier of the session that was started
    pub session_id: String,

    /// Human-readable note from the backend
    #[serde(default)]
    pub message: Option<String>,
}

/// Acknowledgment of `POST /session/save` and `POST /session/clear`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAck {
    /// Backend status tag, `session_saved` or `session_cleared`
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub message: Option<String>,
}

/// One agent in the live session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Agent type, e.g. `planner_agent`
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    /// Messages currently held in the agent's memory
    #[serde(default)]
    pub memory_messages: u64,
}

/// Response of `GET /session/info`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentSessionInfo {
    #[serde(default)]
    pub agents: Vec<AgentInfo>,

    /// Whether an answer is being generated right now
    #[serde(default)]
    pub is_generating: bool,

    #[serde(default)]
    pub current_agent: Option<String>,
}

/// Stored messages of one agent inside a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMemory {
    /// Number of messages
    #[serde(default)]
    pub message_count: u64,

    /// Raw messages as stored by the agent
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
}

/// Response of `GET /sessions/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    /// Session identifier
    pub session_id: String,

    /// Messages keyed by agent type (e.g. `planner_agent`)
    #[serde(default)]
    pub agents: BTreeMap<String, AgentMemory>,
}

/// One entry of a workspace directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceItem {
    /// Entry name
    pub name: String,

    /// Path relative to the workspace root
    pub path: String,

    /// Whether the entry is a directory
    #[serde(default)]
    pub is_dir: bool,

    /// Size in bytes; `None` for directories
    #[serde(default)]
    pub size: Option<u64>,

    /// Last modification time (epoch seconds)
    #[serde(default)]
    pub modified: Option<f64>,
}

impl WorkspaceItem {
    /// Describe a file known only by its path
    ///
    /// # Examples
    ///
    /// ```
    /// use agentdesk::client::WorkspaceItem;
    ///
    /// let item = WorkspaceItem::file("reports/q1.csv");
    /// assert_eq!(item.name, "q1.csv");
    /// assert!(!item.is_dir);
    /// ```
    pub fn file(path: &str) -> Self {
        let trimmed = path.trim_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed).to_string();
        Self {
            name,
            path: trimmed.to_string(),
            is_dir: false,
            size: None,
            modified: None,
        }
    }
}

/// Response of `GET /files`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// Resolved path relative to the workspace root (empty at the root)
    #[serde(default)]
    pub path: String,

    /// Entries, directories first
    #[serde(default)]
    pub items: Vec<WorkspaceItem>,

    /// Parent path as computed by the backend
    #[serde(default)]
    pub parent: Option<String>,
}

/// Response of `GET /files/view`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    /// File name
    pub name: String,

    /// Size in bytes
    #[serde(default)]
    pub size: u64,

    /// Kind label (`python`, `markdown`, `text`, ...)
    #[serde(rename = "type", default)]
    pub kind: String,

    /// File text
    #[serde(default)]
    pub content: String,

    /// Path relative to the workspace root
    #[serde(default)]
    pub path: Option<String>,
}

/// LLM provider configuration held by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider identifier (`ollama`, `lm-studio`, ...)
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    /// Model name, free-form
    #[serde(default)]
    pub provider_model: String,

    /// Provider server address
    #[serde(default = "default_server_address")]
    pub provider_server_address: String,

    /// Whether the provider runs on the local machine
    #[serde(default = "default_is_local")]
    pub is_local: bool,
}

fn default_provider_name() -> String {
    "lm-studio".to_string()
}

fn default_server_address() -> String {
    "http://127.0.0.1:1234".to_string()
}

fn default_is_local() -> bool {
    true
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            provider_model: String::new(),
            provider_server_address: default_server_address(),
            is_local: default_is_local(),
        }
    }
}

/// Acknowledgment of `POST /llm/settings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SaveAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /llm/check-connection`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionCheckRequest {
    pub provider_name: String,
    pub server_address: String,
}

/// Response of `POST /llm/check-connection`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionCheckResponse {
    /// Whether the provider answered
    pub connected: bool,

    /// Human-readable outcome
    #[serde(default)]
    pub message: Option<String>,

    /// Models the provider reported, when it reported any list at all
    #[serde(default)]
    pub models: Option<Vec<String>>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Error body shapes the backend produces
///
/// FastAPI validation failures use `detail`, handlers use `error`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Most specific message carried by the body
    pub fn message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        match &self.detail {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(serde_json::Value::Null) | None => self.message.clone(),
            Some(other) => Some(other.to_string()),
        }
    }
}
