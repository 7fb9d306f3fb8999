//! reqwest implementation of [`BackendClient`]
//!
//! Every endpoint URL is derived from the injected base URL by appending
//! percent-encoded path segments, so session ids and workspace paths never
//! need manual escaping.

use crate::client::types::{
    ConnectionCheckRequest, ConnectionCheckResponse, CurrentSessionInfo, DirectoryListing,
    ErrorBody, FileContent, HealthStatus, NewSession, ProviderSettings, SaveAck, Session,
    SessionAck, SessionDetail, SessionListResponse, BINARY_FILE_ERROR,
};
use crate::client::BackendClient;
use crate::config::BackendConfig;
use crate::error::{server_message, AgentDeskError, Result};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// HTTP client for the agent backend
///
/// # Examples
///
/// ```
/// use agentdesk::client::{BackendClient, HttpBackendClient};
/// use agentdesk::config::BackendConfig;
///
/// let client = HttpBackendClient::new(&BackendConfig::default()).unwrap();
/// let url = client.download_url("reports/q1.csv").unwrap();
/// assert_eq!(
///     url.as_str(),
///     "http://127.0.0.1:7777/files/download?path=reports%2Fq1.csv"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    client: Client,
    base_url: Url,
}

impl HttpBackendClient {
    /// Create a client for the backend described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if the base URL does not parse or the HTTP client cannot
    /// be built
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AgentDeskError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AgentDeskError::Config(format!(
                "Base URL cannot carry paths: {}",
                config.base_url
            ))
            .into());
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| AgentDeskError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized backend client: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// Base URL every endpoint is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Underlying reqwest client, shared with the download writer
    pub fn http(&self) -> &Client {
        &self.client
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AgentDeskError::Config("Base URL cannot carry paths".to_string()))?;
            path.pop_if_empty();
            path.extend(segments.iter().copied());
        }
        Ok(url)
    }

    fn endpoint_with_path_query(&self, segments: &[&str], path: &str) -> Result<Url> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut().append_pair("path", path);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} failed before a response arrived: {}", action, e);
            AgentDeskError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message());
        tracing::debug!(
            "{} rejected by backend: status={}, message={:?}",
            action,
            status,
            message
        );

        Err(AgentDeskError::Server {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    async fn decode<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AgentDeskError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AgentDeskError::Decode(format!("{}: {}", action, e)).into())
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let url = self.endpoint(&["sessions"])?;
        let response = self.send(self.client.get(url), "list sessions").await?;
        let body: SessionListResponse = Self::decode(response, "list sessions").await?;
        tracing::debug!("Fetched {} sessions", body.sessions.len());
        Ok(body.sessions)
    }

    async fn create_session(&self) -> Result<NewSession> {
        let url = self.endpoint(&["sessions", "new"])?;
        let response = self.send(self.client.post(url), "create session").await?;
        Self::decode(response, "create session").await
    }

    async fn load_session(&self, id: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(&["sessions", id, "load"])?;
        let response = self.send(self.client.post(url), "load session").await?;
        Self::decode(response, "load session").await
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["sessions", id])?;
        self.send(self.client.delete(url), "delete session").await?;
        Ok(())
    }

    async fn session_detail(&self, id: &str) -> Result<SessionDetail> {
        let url = self.endpoint(&["sessions", id])?;
        let response = self.send(self.client.get(url), "get session").await?;
        Self::decode(response, "get session").await
    }

    async fn save_current_session(&self) -> Result<SessionAck> {
        let url = self.endpoint(&["session", "save"])?;
        let response = self.send(self.client.post(url), "save session").await?;
        Self::decode(response, "save session").await
    }

    async fn clear_current_session(&self) -> Result<SessionAck> {
        let url = self.endpoint(&["session", "clear"])?;
        let response = self.send(self.client.post(url), "clear session").await?;
        Self::decode(response, "clear session").await
    }

    async fn current_session_info(&self) -> Result<CurrentSessionInfo> {
        let url = self.endpoint(&["session", "info"])?;
        let response = self.send(self.client.get(url), "session info").await?;
        Self::decode(response, "session info").await
    }

    async fn list_directory(&self, path: &str) -> Result<DirectoryListing> {
        let url = self.endpoint_with_path_query(&["files"], path)?;
        let response = self.send(self.client.get(url), "list directory").await?;
        Self::decode(response, "list directory").await
    }

    async fn view_file(&self, path: &str) -> Result<FileContent> {
        let url = self.endpoint_with_path_query(&["files", "view"], path)?;
        let response = match self.send(self.client.get(url), "view file").await {
            Ok(response) => response,
            Err(err) if server_message(&err).as_deref() == Some(BINARY_FILE_ERROR) => {
                return Err(AgentDeskError::BinaryFile(path.to_string()).into());
            }
            Err(err) => return Err(err),
        };
        Self::decode(response, "view file").await
    }

    fn download_url(&self, path: &str) -> Result<Url> {
        self.endpoint_with_path_query(&["files", "download"], path)
    }

    async fn get_settings(&self) -> Result<ProviderSettings> {
        let url = self.endpoint(&["llm", "settings"])?;
        let response = self.send(self.client.get(url), "get settings").await?;
        Self::decode(response, "get settings").await
    }

    async fn save_settings(&self, settings: &ProviderSettings) -> Result<SaveAck> {
        let url = self.endpoint(&["llm", "settings"])?;
        let response = self
            .send(self.client.post(url).json(settings), "save settings")
            .await?;
        Self::decode(response, "save settings").await
    }

    async fn check_connection(
        &self,
        request: &ConnectionCheckRequest,
    ) -> Result<ConnectionCheckResponse> {
        let url = self.endpoint(&["llm", "check-connection"])?;
        let response = self
            .send(self.client.post(url).json(request), "check connection")
            .await?;
        Self::decode(response, "check connection").await
    }

    async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["health"])?;
        let response = self.send(self.client.get(url), "health check").await?;
        Self::decode(response, "health check").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> HttpBackendClient {
        HttpBackendClient::new(&BackendConfig {
            base_url: base_url.to_string(),
            ..BackendConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let result = HttpBackendClient::new(&BackendConfig {
            base_url: "not a url".to_string(),
            ..BackendConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_joins_root_base() {
        let client = client_for("http://127.0.0.1:7777");
        let url = client.endpoint(&["sessions", "new"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:7777/sessions/new");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = client_for("http://backend.local/api/");
        let url = client.endpoint(&["llm", "settings"]).unwrap();
        assert_eq!(url.as_str(), "http://backend.local/api/llm/settings");

        let client = client_for("http://backend.local/api");
        let url = client.endpoint(&["health"]).unwrap();
        assert_eq!(url.as_str(), "http://backend.local/api/health");
    }

    #[test]
    fn test_endpoint_encodes_session_id() {
        let client = client_for("http://127.0.0.1:7777");
        let url = client.endpoint(&["sessions", "a/b c", "load"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:7777/sessions/a%2Fb%20c/load");
    }

    #[test]
    fn test_download_url_encodes_path_query() {
        let client = client_for("http://127.0.0.1:7777");
        let url = client.download_url("my docs/report.pdf").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:7777/files/download?path=my+docs%2Freport.pdf"
        );
    }
}
