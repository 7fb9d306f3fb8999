//! View controllers for sessions, workspace files and provider settings
//!
//! Each controller owns its view state behind a mutex that is never held
//! across an `.await`, so overlapping calls on one instance are safe and the
//! in-flight rules (disabled controls) are enforced here rather than by the
//! caller. Controllers share nothing with each other except the injected
//! [`BackendClient`](crate::client::BackendClient).

pub mod sessions;
pub mod settings;
pub mod workspace;

pub use sessions::{DeleteOutcome, SessionListController, SessionRow};
pub use settings::{ConnectionProbe, ProbeStatus, ProviderSettingsController, SettingsField};
pub use workspace::{Activation, BackOutcome, BrowserView, ItemRow, WorkspaceBrowserController};

use crate::error::AgentDeskError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// How long transient notices stay visible
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Outcome of a request that a newer request may have superseded
#[derive(Debug, Clone, PartialEq)]
pub enum Freshness<T> {
    /// The response was applied to the view
    Fresh(T),
    /// A newer request was issued meanwhile; the response was dropped
    Stale,
}

impl<T> Freshness<T> {
    /// The applied value, if this response was not superseded
    pub fn fresh(self) -> Option<T> {
        match self {
            Self::Fresh(value) => Some(value),
            Self::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// Monotonic generation counter for last-request-wins
#[derive(Debug, Default)]
pub(crate) struct Generations {
    latest: AtomicU64,
}

impl Generations {
    /// Start a request and return its token
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether no request was started after `token`
    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}

/// Severity of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Message that disappears on its own after a fixed delay
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    posted_at: Instant,
    ttl: Duration,
}

impl Notice {
    /// Post a notice now with the standard lifetime
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            posted_at: Instant::now(),
            ttl: NOTICE_TTL,
        }
    }

    /// Whether the notice is still on screen
    pub fn is_visible(&self) -> bool {
        self.posted_at.elapsed() < self.ttl
    }

    /// Time left before the notice clears itself
    pub fn remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.posted_at.elapsed())
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resets an in-flight marker when dropped
///
/// Held across the request `.await`, so the marker is cleared both when the
/// request finishes and when the caller drops the future mid-request. The
/// reset locks the state, so it must be dropped after any guard on the same
/// mutex.
pub(crate) struct InFlight<'a, T, F>
where
    F: FnOnce(&mut T),
{
    state: &'a Mutex<T>,
    reset: Option<F>,
}

impl<'a, T, F> Drop for InFlight<'a, T, F>
where
    F: FnOnce(&mut T),
{
    fn drop(&mut self) {
        if let Some(reset) = self.reset.take() {
            reset(&mut lock(self.state));
        }
    }
}

pub(crate) fn in_flight<T, F>(state: &Mutex<T>, reset: F) -> InFlight<'_, T, F>
where
    F: FnOnce(&mut T),
{
    InFlight {
        state,
        reset: Some(reset),
    }
}

pub(crate) fn busy(reason: &str) -> anyhow::Error {
    AgentDeskError::Busy(reason.to_string()).into()
}

/// Whether an error means the action was disabled
pub fn is_busy(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<AgentDeskError>(),
        Some(AgentDeskError::Busy(_))
    )
}
