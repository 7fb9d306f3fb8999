use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use url::Url;
use wiremock::MockServer;

use agentdesk::client::{BackendClient, HttpBackendClient};
use agentdesk::config::BackendConfig;
use agentdesk::confirm::Confirm;
use agentdesk::download::Downloader;

/// Client pointed at a wiremock server
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> Arc<dyn BackendClient> {
    Arc::new(
        HttpBackendClient::new(&BackendConfig {
            base_url: server.uri(),
            ..BackendConfig::default()
        })
        .expect("valid backend config"),
    )
}

/// Confirmation that answers from a fixed script and records prompts
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

/// Downloader that records requested URLs instead of fetching them
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingDownloader {
    calls: Mutex<Vec<(Url, String)>>,
}

#[allow(dead_code)]
impl RecordingDownloader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(Url, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for RecordingDownloader {
    async fn download(&self, url: &Url, file_name: &str) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((url.clone(), file_name.to_string()));
        Ok(())
    }
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
