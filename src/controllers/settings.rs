//! Provider settings controller
//!
//! Holds an editable draft of the backend's LLM provider settings, probes the
//! configured provider for connectivity and models, and saves the draft back.
//! Saved settings only take effect after the backend restarts.

use crate::client::{BackendClient, ConnectionCheckRequest, ProviderSettings, SaveAck};
use crate::controllers::{busy, in_flight, lock, Notice, NoticeKind};
use crate::error::{banner_text, AgentDeskError, Result};
use crate::providers::provider_hint;

use std::fmt;
use std::sync::{Arc, Mutex};

/// Notice posted after a successful save
pub const SAVED_NOTICE: &str = "Settings saved. Restart the backend to apply changes.";

/// Connectivity state of the configured provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStatus {
    #[default]
    Unknown,
    Checking,
    Connected,
    Disconnected,
    Error,
}

impl ProbeStatus {
    /// Whether `self -> next` is an allowed change
    pub fn can_transition(self, next: ProbeStatus) -> bool {
        use ProbeStatus::*;
        matches!(
            (self, next),
            (Unknown, Checking)
                | (Checking, Connected)
                | (Checking, Disconnected)
                | (Checking, Error)
                | (Connected, Checking)
                | (Disconnected, Checking)
                | (Error, Checking)
        )
    }

    /// Move to `next`, rejecting changes outside the allowed set
    ///
    /// # Examples
    ///
    /// ```
    /// use agentdesk::controllers::ProbeStatus;
    ///
    /// let checking = ProbeStatus::Unknown.transition(ProbeStatus::Checking).unwrap();
    /// assert!(checking.transition(ProbeStatus::Checking).is_err());
    /// ```
    pub fn transition(self, next: ProbeStatus) -> Result<ProbeStatus> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(AgentDeskError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            }
            .into())
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Checking => "checking",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the last connection check
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionProbe {
    pub status: ProbeStatus,
    pub message: Option<String>,
    /// Models reported by the provider; kept when a later response omits them
    pub models: Vec<String>,
}

/// One editable settings field
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsField {
    ProviderName(String),
    Model(String),
    ServerAddress(String),
    IsLocal(bool),
}

#[derive(Debug, Default)]
struct SettingsState {
    draft: ProviderSettings,
    probe: ConnectionProbe,
    saving: bool,
    notice: Option<Notice>,
}

/// Controller behind the settings panel
pub struct ProviderSettingsController {
    client: Arc<dyn BackendClient>,
    state: Mutex<SettingsState>,
}

impl ProviderSettingsController {
    /// Create a controller whose draft holds the client defaults
    pub fn new(client: Arc<dyn BackendClient>) -> Self {
        Self {
            client,
            state: Mutex::new(SettingsState::default()),
        }
    }

    /// Replace the draft with the backend's current settings
    ///
    /// On failure the draft is left untouched and no notice is posted.
    pub async fn load_settings(&self) -> Result<ProviderSettings> {
        match self.client.get_settings().await {
            Ok(settings) => {
                tracing::debug!("Loaded provider settings for {}", settings.provider_name);
                lock(&self.state).draft = settings.clone();
                Ok(settings)
            }
            Err(err) => {
                tracing::warn!("Failed to load provider settings, keeping defaults: {:#}", err);
                Err(err)
            }
        }
    }

    /// Edit one field of the local draft
    pub fn update_field(&self, field: SettingsField) {
        let mut state = lock(&self.state);
        match field {
            SettingsField::ProviderName(name) => state.draft.provider_name = name,
            SettingsField::Model(model) => state.draft.provider_model = model,
            SettingsField::ServerAddress(address) => state.draft.provider_server_address = address,
            SettingsField::IsLocal(is_local) => state.draft.is_local = is_local,
        }
    }

    /// Probe the drafted provider and address
    ///
    /// Transport and HTTP failures end in [`ProbeStatus::Error`] and are
    /// reported through the returned probe rather than as an `Err`.
    pub async fn check_connection(&self) -> Result<ConnectionProbe> {
        let (request, previous) = {
            let mut state = lock(&self.state);
            if state.probe.status == ProbeStatus::Checking {
                return Err(busy("a connection check is already running"));
            }
            let previous = state.probe.status;
            state.probe.status = previous.transition(ProbeStatus::Checking)?;
            state.probe.message = None;
            let request = ConnectionCheckRequest {
                provider_name: state.draft.provider_name.clone(),
                server_address: state.draft.provider_server_address.clone(),
            };
            (request, previous)
        };
        // An abandoned check leaves the status it started from.
        let _checking = in_flight(&self.state, move |state| {
            if state.probe.status == ProbeStatus::Checking {
                state.probe.status = previous;
            }
        });

        tracing::info!(
            "Checking connection to {} at {}",
            request.provider_name,
            request.server_address
        );
        let result = self.client.check_connection(&request).await;

        let mut state = lock(&self.state);
        match result {
            Ok(response) => {
                let next = if response.connected {
                    ProbeStatus::Connected
                } else {
                    ProbeStatus::Disconnected
                };
                state.probe.status = state.probe.status.transition(next)?;
                state.probe.message = Some(response.message.unwrap_or_else(|| {
                    if response.connected {
                        "Connected".to_string()
                    } else {
                        "Not connected".to_string()
                    }
                }));
                if let Some(models) = response.models {
                    state.probe.models = models;
                }
            }
            Err(err) => {
                tracing::warn!("Connection check failed: {:#}", err);
                state.probe.status = state.probe.status.transition(ProbeStatus::Error)?;
                state.probe.message = Some(banner_text(&err, "Connection check failed"));
            }
        }
        Ok(state.probe.clone())
    }

    /// Use a model reported by the last probe
    pub fn select_model(&self, name: &str) -> Result<()> {
        let mut state = lock(&self.state);
        if !state.probe.models.iter().any(|model| model == name) {
            return Err(AgentDeskError::UnknownModel(name.to_string()).into());
        }
        state.draft.provider_model = name.to_string();
        Ok(())
    }

    /// Send the draft to the backend and post a notice with the outcome
    pub async fn save_settings(&self) -> Result<SaveAck> {
        let draft = {
            let mut state = lock(&self.state);
            if state.saving {
                return Err(busy("settings are already being saved"));
            }
            state.saving = true;
            state.draft.clone()
        };
        let _saving = in_flight(&self.state, |state| state.saving = false);

        let result = self.client.save_settings(&draft).await;

        let mut state = lock(&self.state);
        state.saving = false;
        match result {
            Ok(ack) => {
                tracing::info!("Saved provider settings for {}", draft.provider_name);
                state.notice = Some(Notice::new(NoticeKind::Success, SAVED_NOTICE));
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!("Failed to save provider settings: {:#}", err);
                state.notice = Some(Notice::new(
                    NoticeKind::Error,
                    banner_text(&err, "Failed to save settings"),
                ));
                Err(err)
            }
        }
    }

    /// Current notice, cleared once it has expired
    pub fn notice(&self) -> Option<Notice> {
        let mut state = lock(&self.state);
        if state.notice.as_ref().is_some_and(|notice| !notice.is_visible()) {
            state.notice = None;
        }
        state.notice.clone()
    }

    pub fn draft(&self) -> ProviderSettings {
        lock(&self.state).draft.clone()
    }

    pub fn probe(&self) -> ConnectionProbe {
        lock(&self.state).probe.clone()
    }

    /// Hint for the drafted provider
    pub fn hint(&self) -> &'static str {
        provider_hint(&lock(&self.state).draft.provider_name)
    }

    pub fn is_saving(&self) -> bool {
        lock(&self.state).saving
    }

    pub fn is_checking(&self) -> bool {
        lock(&self.state).probe.status == ProbeStatus::Checking
    }
}
