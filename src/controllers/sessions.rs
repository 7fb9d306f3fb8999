//! Session list controller
//!
//! Lists, creates, loads and deletes conversation sessions. Mutations are
//! never applied optimistically: the list is re-fetched after the backend
//! acknowledges a create or delete.

use crate::client::{BackendClient, CurrentSessionInfo, Session, SessionAck, SessionDetail};
use crate::confirm::Confirm;
use crate::controllers::{busy, in_flight, lock, Freshness, Generations};
use crate::error::{banner_text, server_message, Result};
use crate::format::{session_date_label, session_time_label};

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Called with the id of a freshly created session
pub type NewSessionCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Called with the id and backend payload of a loaded session
pub type SessionLoadedCallback = Box<dyn Fn(&str, &serde_json::Value) + Send + Sync>;

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The backend removed the session and the list was refreshed
    Deleted,
    /// The user declined; nothing was sent
    Declined,
}

/// Display row for one session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub id: String,
    pub preview: String,
    pub message_count: u64,
    pub date_label: String,
    pub time_label: String,
    pub selected: bool,
    pub deleting: bool,
}

#[derive(Debug, Default)]
struct SessionListState {
    sessions: Vec<Session>,
    fetched_once: bool,
    loading: bool,
    error: Option<String>,
    selected: Option<String>,
    creating: bool,
    loading_session: Option<String>,
    deleting: HashSet<String>,
    updating_current: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurrentUpdate {
    Save,
    Clear,
}

impl CurrentUpdate {
    fn verb(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Clear => "clear",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Self::Save => "saved",
            Self::Clear => "cleared",
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            Self::Save => "Failed to save session",
            Self::Clear => "Failed to clear session",
        }
    }
}

/// Controller behind the chat-history sidebar
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use agentdesk::client::HttpBackendClient;
/// use agentdesk::config::Config;
/// use agentdesk::confirm::TerminalConfirm;
/// use agentdesk::controllers::SessionListController;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = Arc::new(HttpBackendClient::new(&Config::default().backend)?);
/// let sessions = SessionListController::new(client, Arc::new(TerminalConfirm))
///     .on_session_loaded(|id, _payload| println!("now chatting in {}", id));
/// sessions.list_sessions().await?;
/// for row in sessions.rows() {
///     println!("{} {} {}", row.date_label, row.time_label, row.preview);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SessionListController {
    client: Arc<dyn BackendClient>,
    confirm: Arc<dyn Confirm>,
    on_new_session: Option<NewSessionCallback>,
    on_session_loaded: Option<SessionLoadedCallback>,
    generations: Generations,
    state: Mutex<SessionListState>,
}

impl SessionListController {
    /// Create a controller with an injected backend and confirmation prompt
    pub fn new(client: Arc<dyn BackendClient>, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            client,
            confirm,
            on_new_session: None,
            on_session_loaded: None,
            generations: Generations::default(),
            state: Mutex::new(SessionListState::default()),
        }
    }

    /// Register the "new session" callback
    pub fn on_new_session(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_new_session = Some(Box::new(callback));
        self
    }

    /// Register the "session loaded" callback
    pub fn on_session_loaded(
        mut self,
        callback: impl Fn(&str, &serde_json::Value) + Send + Sync + 'static,
    ) -> Self {
        self.on_session_loaded = Some(Box::new(callback));
        self
    }

    /// Fetch all sessions and replace the displayed list
    ///
    /// A failure keeps the previous list and sets the error banner. A response
    /// overtaken by a newer fetch is dropped and reported as `Stale`.
    pub async fn list_sessions(&self) -> Result<Freshness<Vec<Session>>> {
        let token = self.generations.begin();
        lock(&self.state).loading = true;
        let _loading = in_flight(&self.state, |state| {
            if self.generations.is_current(token) {
                state.loading = false;
            }
        });

        let result = self.client.list_sessions().await;

        let mut state = lock(&self.state);
        if !self.generations.is_current(token) {
            tracing::debug!("Dropping superseded session list response");
            return Ok(Freshness::Stale);
        }
        state.loading = false;

        match result {
            Ok(sessions) => {
                state.sessions = sessions.clone();
                state.fetched_once = true;
                state.error = None;
                Ok(Freshness::Fresh(sessions))
            }
            Err(err) => {
                tracing::warn!("Failed to load sessions: {:#}", err);
                if !state.fetched_once {
                    state.sessions.clear();
                }
                state.error = Some(match server_message(&err) {
                    Some(message) => format!("Failed to load sessions: {}", message),
                    None => "Failed to load sessions".to_string(),
                });
                Err(err)
            }
        }
    }

    /// Ask the backend for a new session, then refresh the list
    ///
    /// Rejected while another creation is pending.
    pub async fn create_session(&self) -> Result<String> {
        {
            let mut state = lock(&self.state);
            if state.creating {
                return Err(busy("a session is already being created"));
            }
            state.creating = true;
        }
        let _creating = in_flight(&self.state, |state| state.creating = false);

        let created = match self.client.create_session().await {
            Ok(created) => created,
            Err(err) => {
                tracing::warn!("Failed to create session: {:#}", err);
                lock(&self.state).error = Some(banner_text(&err, "Failed to create session"));
                return Err(err);
            }
        };

        tracing::info!("Created session {}", created.session_id);
        if let Some(callback) = &self.on_new_session {
            callback(&created.session_id);
        }

        if let Err(err) = self.list_sessions().await {
            tracing::debug!("Refresh after create failed: {}", err);
        }

        Ok(created.session_id)
    }

    /// Activate a session on the backend and mark it selected
    ///
    /// Only one load may be in flight per controller; a second call while one
    /// is pending is rejected without a request.
    pub async fn load_session(&self, id: &str) -> Result<serde_json::Value> {
        {
            let mut state = lock(&self.state);
            if let Some(pending) = &state.loading_session {
                return Err(busy(&format!("session {} is still loading", pending)));
            }
            state.loading_session = Some(id.to_string());
        }
        let _loading = in_flight(&self.state, |state| state.loading_session = None);

        let result = self.client.load_session(id).await;

        let payload = {
            let mut state = lock(&self.state);
            state.loading_session = None;
            match result {
                Ok(payload) => {
                    state.selected = Some(id.to_string());
                    state.error = None;
                    payload
                }
                Err(err) => {
                    tracing::warn!("Failed to load session {}: {:#}", id, err);
                    state.error = Some(banner_text(&err, "Failed to load session"));
                    return Err(err);
                }
            }
        };

        tracing::info!("Loaded session {}", id);
        if let Some(callback) = &self.on_session_loaded {
            callback(id, &payload);
        }

        Ok(payload)
    }

    /// Delete a session after confirmation, then refresh the list
    pub async fn delete_session(&self, id: &str) -> Result<DeleteOutcome> {
        if !self.can_delete(id) {
            return Err(busy(&format!("session {} is already being deleted", id)));
        }

        let prompt = format!("Delete session {}? This cannot be undone.", id);
        if !self.confirm.confirm(&prompt).await {
            tracing::debug!("Deletion of session {} declined", id);
            return Ok(DeleteOutcome::Declined);
        }

        {
            let mut state = lock(&self.state);
            if !state.deleting.insert(id.to_string()) {
                return Err(busy(&format!("session {} is already being deleted", id)));
            }
        }
        let _deleting = in_flight(&self.state, |state| {
            state.deleting.remove(id);
        });

        let result = self.client.delete_session(id).await;

        {
            let mut state = lock(&self.state);
            state.deleting.remove(id);
            match &result {
                Ok(()) => {
                    if state.selected.as_deref() == Some(id) {
                        state.selected = None;
                    }
                }
                Err(err) => {
                    tracing::warn!("Failed to delete session {}: {:#}", id, err);
                    state.error = Some(banner_text(err, "Failed to delete session"));
                }
            }
        }
        result?;

        tracing::info!("Deleted session {}", id);
        if let Err(err) = self.list_sessions().await {
            tracing::debug!("Refresh after delete failed: {}", err);
        }

        Ok(DeleteOutcome::Deleted)
    }

    /// Write the agents' current memory to a saved session, then refresh
    ///
    /// Rejected while a save or clear of the current session is pending.
    pub async fn save_current(&self) -> Result<SessionAck> {
        self.update_current(CurrentUpdate::Save).await
    }

    /// Empty the agents' memory, then refresh the list
    ///
    /// The selection is dropped because no saved session is active anymore.
    pub async fn clear_current(&self) -> Result<SessionAck> {
        self.update_current(CurrentUpdate::Clear).await
    }

    async fn update_current(&self, update: CurrentUpdate) -> Result<SessionAck> {
        {
            let mut state = lock(&self.state);
            if state.updating_current {
                return Err(busy("the current session is already being updated"));
            }
            state.updating_current = true;
        }
        let _updating = in_flight(&self.state, |state| state.updating_current = false);

        let result = match update {
            CurrentUpdate::Save => self.client.save_current_session().await,
            CurrentUpdate::Clear => self.client.clear_current_session().await,
        };

        let ack = {
            let mut state = lock(&self.state);
            state.updating_current = false;
            match result {
                Ok(ack) => {
                    if update == CurrentUpdate::Clear {
                        state.selected = None;
                    }
                    state.error = None;
                    ack
                }
                Err(err) => {
                    tracing::warn!("Failed to {} current session: {:#}", update.verb(), err);
                    state.error = Some(banner_text(&err, update.fallback()));
                    return Err(err);
                }
            }
        };

        tracing::info!("Current session {}", update.past_tense());
        if let Err(err) = self.list_sessions().await {
            tracing::debug!("Refresh after {} failed: {}", update.verb(), err);
        }

        Ok(ack)
    }

    /// Live state of the agents' memory; does not change the view
    pub async fn current_session_info(&self) -> Result<CurrentSessionInfo> {
        self.client.current_session_info().await
    }

    /// Stored messages of a session; does not change the view
    pub async fn session_detail(&self, id: &str) -> Result<SessionDetail> {
        self.client.session_detail(id).await
    }

    /// Sessions currently displayed
    pub fn sessions(&self) -> Vec<Session> {
        lock(&self.state).sessions.clone()
    }

    /// Display rows with derived date and time labels
    pub fn rows(&self) -> Vec<SessionRow> {
        let state = lock(&self.state);
        state
            .sessions
            .iter()
            .map(|session| SessionRow {
                id: session.id.clone(),
                preview: session.preview.clone().unwrap_or_default(),
                message_count: session.message_count,
                date_label: session_date_label(&session.id),
                time_label: session_time_label(&session.id),
                selected: state.selected.as_deref() == Some(session.id.as_str()),
                deleting: state.deleting.contains(&session.id),
            })
            .collect()
    }

    pub fn selected(&self) -> Option<String> {
        lock(&self.state).selected.clone()
    }

    /// Current error banner
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    pub fn dismiss_error(&self) {
        lock(&self.state).error = None;
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn can_create(&self) -> bool {
        !lock(&self.state).creating
    }

    /// Whether load triggers are enabled (no load in flight)
    pub fn can_load(&self) -> bool {
        lock(&self.state).loading_session.is_none()
    }

    pub fn can_delete(&self, id: &str) -> bool {
        !lock(&self.state).deleting.contains(id)
    }

    /// Whether save and clear of the current session are enabled
    pub fn can_update_current(&self) -> bool {
        !lock(&self.state).updating_current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpBackendClient;
    use crate::config::BackendConfig;
    use crate::confirm::MockConfirm;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Arc<dyn BackendClient> {
        Arc::new(
            HttpBackendClient::new(&BackendConfig {
                base_url: server.uri(),
                ..BackendConfig::default()
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|prompt| prompt.contains("2024-01-01_09-30-00"))
            .times(1)
            .return_const(false);

        let controller = SessionListController::new(client_for(&server), Arc::new(confirm));
        let outcome = controller
            .delete_session("2024-01-01_09-30-00")
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(controller.error().is_none());
    }

    #[tokio::test]
    async fn test_confirmed_delete_refreshes_and_clears_selection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions/2024-01-01_09-30-00/load"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "session_loaded"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/sessions/2024-01-01_09-30-00"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"status": "session_deleted", "files_deleted": 5}),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"sessions": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().times(1).return_const(true);

        let controller = SessionListController::new(client_for(&server), Arc::new(confirm));
        controller
            .load_session("2024-01-01_09-30-00")
            .await
            .unwrap();
        assert_eq!(controller.selected().as_deref(), Some("2024-01-01_09-30-00"));

        let outcome = controller
            .delete_session("2024-01-01_09-30-00")
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(controller.selected().is_none());
        assert!(controller.sessions().is_empty());
        assert!(controller.can_delete("2024-01-01_09-30-00"));
    }

    #[tokio::test]
    async fn test_failed_delete_sets_banner_and_skips_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "Session not found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().times(1).return_const(true);

        let controller = SessionListController::new(client_for(&server), Arc::new(confirm));
        assert!(controller.delete_session("missing").await.is_err());
        assert_eq!(controller.error().as_deref(), Some("Session not found"));
        assert!(controller.can_delete("missing"));
    }
}
