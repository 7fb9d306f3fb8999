//! Backend client module for AgentDesk
//!
//! This module contains the [`BackendClient`] abstraction shared by all
//! controllers and the reqwest-backed [`HttpBackendClient`].

pub mod http;
pub mod types;

pub use http::HttpBackendClient;
pub use types::{
    AgentInfo, AgentMemory, ConnectionCheckRequest, ConnectionCheckResponse, CurrentSessionInfo,
    DirectoryListing, FileContent, HealthStatus, NewSession, ProviderSettings, SaveAck, Session,
    SessionAck, SessionDetail, WorkspaceItem, BINARY_FILE_ERROR,
};

use crate::error::Result;
use async_trait::async_trait;

/// Request/response contract of the agent backend
///
/// Implementations map transport failures to
/// [`AgentDeskError::Transport`](crate::error::AgentDeskError::Transport),
/// non-success statuses to
/// [`AgentDeskError::Server`](crate::error::AgentDeskError::Server), and the
/// backend's binary-file refusal to
/// [`AgentDeskError::BinaryFile`](crate::error::AgentDeskError::BinaryFile).
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// `GET /sessions`
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// `POST /sessions/new`
    async fn create_session(&self) -> Result<NewSession>;

    /// `POST /sessions/{id}/load`, returning the full response payload
    async fn load_session(&self, id: &str) -> Result<serde_json::Value>;

    /// `DELETE /sessions/{id}`
    async fn delete_session(&self, id: &str) -> Result<()>;

    /// `GET /sessions/{id}`
    async fn session_detail(&self, id: &str) -> Result<SessionDetail>;

    /// `POST /session/save`
    async fn save_current_session(&self) -> Result<SessionAck>;

    /// `POST /session/clear`
    async fn clear_current_session(&self) -> Result<SessionAck>;

    /// `GET /session/info`
    async fn current_session_info(&self) -> Result<CurrentSessionInfo>;

    /// `GET /files?path=`
    async fn list_directory(&self, path: &str) -> Result<DirectoryListing>;

    /// `GET /files/view?path=`
    async fn view_file(&self, path: &str) -> Result<FileContent>;

    /// URL of `GET /files/download?path=`; no request is made
    fn download_url(&self, path: &str) -> Result<url::Url>;

    /// `GET /llm/settings`
    async fn get_settings(&self) -> Result<ProviderSettings>;

    /// `POST /llm/settings`
    async fn save_settings(&self, settings: &ProviderSettings) -> Result<SaveAck>;

    /// `POST /llm/check-connection`
    async fn check_connection(
        &self,
        request: &ConnectionCheckRequest,
    ) -> Result<ConnectionCheckResponse>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus>;
}
