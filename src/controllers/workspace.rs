//! Workspace browser controller
//!
//! Navigates the backend's workspace directory tree and shows text files
//! inline. Every listing replaces the previous one; nothing is cached between
//! navigations.

use crate::client::{BackendClient, DirectoryListing, FileContent, WorkspaceItem};
use crate::controllers::{busy, in_flight, lock, Freshness, Generations};
use crate::download::Downloader;
use crate::error::{banner_text, AgentDeskError, Result};
use crate::format::{format_size, format_timestamp};

use std::sync::{Arc, Mutex};

/// What the browser is showing
///
/// A listing and a file viewer are never on screen together.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BrowserView {
    #[default]
    Listing,
    Viewing(FileContent),
}

/// Result of activating a workspace item
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// A directory was opened
    Navigated(DirectoryListing),
    /// A text file is shown in the viewer
    Viewed(FileContent),
    /// The file could not be shown as text and was downloaded instead
    Downloaded,
    /// A newer navigation superseded this one
    Stale,
}

/// Result of the back control
#[derive(Debug, Clone, PartialEq)]
pub enum BackOutcome {
    /// The file viewer was closed; no request was made
    ClosedViewer,
    /// The parent directory was listed
    Navigated(Freshness<DirectoryListing>),
    /// Already at the workspace root; nothing happened
    AtRoot,
}

/// Display row for one workspace entry
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size_label: String,
    pub modified_label: String,
}

#[derive(Debug, Default)]
struct BrowserState {
    current_path: String,
    items: Vec<WorkspaceItem>,
    view: BrowserView,
    loading: bool,
    error: Option<String>,
}

/// Controller behind the file browser modal
pub struct WorkspaceBrowserController {
    client: Arc<dyn BackendClient>,
    downloader: Arc<dyn Downloader>,
    generations: Generations,
    state: Mutex<BrowserState>,
}

impl WorkspaceBrowserController {
    /// Create a controller starting at the workspace root
    pub fn new(client: Arc<dyn BackendClient>, downloader: Arc<dyn Downloader>) -> Self {
        Self {
            client,
            downloader,
            generations: Generations::default(),
            state: Mutex::new(BrowserState::default()),
        }
    }

    /// List `path` (empty for the root) and make it the current directory
    ///
    /// Closes the viewer on success. A failure keeps the previous listing and
    /// sets the error banner.
    pub async fn list_directory(&self, path: &str) -> Result<Freshness<DirectoryListing>> {
        let token = self.generations.begin();
        lock(&self.state).loading = true;
        let _loading = in_flight(&self.state, |state| {
            if self.generations.is_current(token) {
                state.loading = false;
            }
        });

        let result = self.client.list_directory(path).await;

        let mut state = lock(&self.state);
        if !self.generations.is_current(token) {
            tracing::debug!("Dropping superseded listing of '{}'", path);
            return Ok(Freshness::Stale);
        }
        state.loading = false;

        match result {
            Ok(listing) => {
                tracing::debug!(
                    "Listed '{}' with {} entries",
                    listing.path,
                    listing.items.len()
                );
                state.current_path = listing.path.clone();
                state.items = listing.items.clone();
                state.view = BrowserView::Listing;
                state.error = None;
                Ok(Freshness::Fresh(listing))
            }
            Err(err) => {
                tracing::warn!("Failed to list '{}': {:#}", path, err);
                state.error = Some(banner_text(&err, "Failed to load directory"));
                Err(err)
            }
        }
    }

    /// Open a directory or view a file
    ///
    /// Files the backend refuses to render as text are downloaded instead,
    /// without an error banner.
    pub async fn activate_item(&self, item: &WorkspaceItem) -> Result<Activation> {
        if item.is_dir {
            return Ok(match self.list_directory(&item.path).await? {
                Freshness::Fresh(listing) => Activation::Navigated(listing),
                Freshness::Stale => Activation::Stale,
            });
        }

        let token = self.generations.begin();
        lock(&self.state).loading = true;
        let _loading = in_flight(&self.state, |state| {
            if self.generations.is_current(token) {
                state.loading = false;
            }
        });

        let result = self.client.view_file(&item.path).await;

        let refusal = {
            let mut state = lock(&self.state);
            if !self.generations.is_current(token) {
                tracing::debug!("Dropping superseded view of '{}'", item.path);
                return Ok(Activation::Stale);
            }
            state.loading = false;

            match result {
                Ok(content) => {
                    state.view = BrowserView::Viewing(content.clone());
                    state.error = None;
                    return Ok(Activation::Viewed(content));
                }
                Err(err) if is_binary_file(&err) => err,
                Err(err) => {
                    tracing::warn!("Failed to view '{}': {:#}", item.path, err);
                    state.error = Some(banner_text(&err, "Failed to load file"));
                    return Err(err);
                }
            }
        };

        tracing::info!("Downloading '{}' instead of viewing: {}", item.path, refusal);
        self.download(item).await?;
        Ok(Activation::Downloaded)
    }

    /// Close the viewer, or go up one directory
    pub async fn go_back(&self) -> Result<BackOutcome> {
        let parent = {
            let mut state = lock(&self.state);
            if matches!(state.view, BrowserView::Viewing(_)) {
                state.view = BrowserView::Listing;
                return Ok(BackOutcome::ClosedViewer);
            }
            match parent_path(&state.current_path) {
                Some(parent) => parent,
                None => return Ok(BackOutcome::AtRoot),
            }
        };

        Ok(BackOutcome::Navigated(self.list_directory(&parent).await?))
    }

    /// Hand the item's download URL to the downloader
    pub async fn download(&self, item: &WorkspaceItem) -> Result<()> {
        let url = self.client.download_url(&item.path)?;
        tracing::debug!("Opening download {}", url);
        self.downloader
            .download(&url, &item.name)
            .await
            .map_err(|err| {
                tracing::warn!("Download of '{}' failed: {:#}", item.path, err);
                err
            })
    }

    /// Re-list the current directory
    ///
    /// Unavailable while a file is being viewed.
    pub async fn refresh(&self) -> Result<Freshness<DirectoryListing>> {
        let path = {
            let state = lock(&self.state);
            if matches!(state.view, BrowserView::Viewing(_)) {
                return Err(busy("refresh is unavailable while a file is open"));
            }
            state.current_path.clone()
        };
        self.list_directory(&path).await
    }

    pub fn current_path(&self) -> String {
        lock(&self.state).current_path.clone()
    }

    pub fn items(&self) -> Vec<WorkspaceItem> {
        lock(&self.state).items.clone()
    }

    pub fn view(&self) -> BrowserView {
        lock(&self.state).view.clone()
    }

    /// File open in the viewer, if any
    pub fn viewed_file(&self) -> Option<FileContent> {
        match &lock(&self.state).view {
            BrowserView::Viewing(content) => Some(content.clone()),
            BrowserView::Listing => None,
        }
    }

    /// Display rows for the current listing
    pub fn rows(&self) -> Vec<ItemRow> {
        lock(&self.state)
            .items
            .iter()
            .map(|item| ItemRow {
                name: item.name.clone(),
                path: item.path.clone(),
                is_dir: item.is_dir,
                size_label: format_size(item.size),
                modified_label: format_timestamp(item.modified),
            })
            .collect()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    pub fn dismiss_error(&self) {
        lock(&self.state).error = None;
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Back is enabled while viewing or below the root
    pub fn can_go_back(&self) -> bool {
        let state = lock(&self.state);
        matches!(state.view, BrowserView::Viewing(_)) || parent_path(&state.current_path).is_some()
    }

    pub fn can_refresh(&self) -> bool {
        matches!(lock(&self.state).view, BrowserView::Listing)
    }
}

fn is_binary_file(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<AgentDeskError>(),
        Some(AgentDeskError::BinaryFile(_))
    )
}

/// Parent of a workspace path, or `None` at the root
///
/// # Examples
///
/// ```
/// use agentdesk::controllers::workspace::parent_path;
///
/// assert_eq!(parent_path("a/b/c"), Some("a/b".to_string()));
/// assert_eq!(parent_path("a"), Some(String::new()));
/// assert_eq!(parent_path(""), None);
/// ```
pub fn parent_path(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(match trimmed.rfind('/') {
        Some(index) => trimmed[..index].to_string(),
        None => String::new(),
    })
}
