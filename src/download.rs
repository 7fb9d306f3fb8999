//! Download capability for workspace files
//!
//! The workspace browser hands a download URL to a [`Downloader`] and keeps
//! no state about it. [`FileDownloader`] streams the file into a local
//! directory.

use crate::client::types::ErrorBody;
use crate::error::{AgentDeskError, Result};

use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Something that can open a download URL
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Fetch `url`, suggesting `file_name` for the result
    async fn download(&self, url: &Url, file_name: &str) -> Result<()>;
}

/// Streams downloads into a directory on disk
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: reqwest::Client,
    dir: PathBuf,
}

impl FileDownloader {
    /// Create a downloader writing into `dir` with the given HTTP client
    pub fn new(client: reqwest::Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    /// Directory downloads land in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a download suggested as `file_name` is written
    pub fn target_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(sanitize_file_name(file_name))
    }
}

#[async_trait]
impl Downloader for FileDownloader {
    async fn download(&self, url: &Url, file_name: &str) -> Result<()> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AgentDeskError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.message());
            return Err(AgentDeskError::Server {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(AgentDeskError::from)?;
        let target = self.target_path(file_name);
        let mut file = tokio::fs::File::create(&target)
            .await
            .map_err(AgentDeskError::from)?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AgentDeskError::Transport(e.to_string()))?;
            file.write_all(&chunk).await.map_err(AgentDeskError::from)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(AgentDeskError::from)?;

        tracing::info!("Downloaded {} bytes to {}", written, target.display());
        Ok(())
    }
}

/// Reduce a suggested name to a single safe path component
///
/// # Examples
///
/// ```
/// use agentdesk::download::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("reports/q1.csv"), "q1.csv");
/// assert_eq!(sanitize_file_name(".."), "download");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
    let cleaned = last.replace('\0', "").trim().to_string();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "download".to_string()
    } else {
        cleaned
    }
}
