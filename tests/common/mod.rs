//! Common test utilities - InitdTest harness for end-to-end testing

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use initd::{Config, Server};
use reqwest::Client;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Test harness that spawns a real initd server on a random port,
/// backed by a temporary data directory
pub struct InitdTest {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    handle: Option<JoinHandle<Result<()>>>,
    data: TempDir,
}

impl InitdTest {
    /// Start a server over the given player and monster files.
    ///
    /// Each entry is `(file name, csv contents)`.
    pub async fn start(players: &[(&str, &str)], monsters: &[(&str, &str)]) -> Result<Self> {
        let data = TempDir::new()?;
        write_files(&data.path().join("players"), players)?;
        write_files(&data.path().join("monsters"), monsters)?;

        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = Config {
            bind_addr: addr,
            ..Config::with_data_dir(data.path())
        };

        let server = Arc::new(Server::new(config).await?);
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move { server_clone.run().await });

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            handle: Some(handle),
            data,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Fetch a page body, asserting 200
    pub async fn page(&self, path: &str) -> Result<String> {
        let resp = self.get(path).await?;
        anyhow::ensure!(resp.status() == 200, "{} returned {}", path, resp.status());
        Ok(resp.text().await?)
    }

    /// Fetch a JSON body, asserting 200
    pub async fn json(&self, path: &str) -> Result<serde_json::Value> {
        let resp = self.get(path).await?;
        anyhow::ensure!(resp.status() == 200, "{} returned {}", path, resp.status());
        Ok(resp.json().await?)
    }

    pub fn players_dir(&self) -> PathBuf {
        self.data.path().join("players")
    }

    pub fn monsters_dir(&self) -> PathBuf {
        self.data.path().join("monsters")
    }

    /// Shutdown the server gracefully
    pub fn shutdown(&self) {
        self.server.shutdown();
    }

    /// Wait for the server task to exit and return its result
    pub async fn wait(&mut self, timeout: Duration) -> Result<Result<()>> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow::anyhow!("server already joined"))?;
        Ok(tokio::time::timeout(timeout, handle).await??)
    }
}

impl Drop for InitdTest {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}

fn write_files(dir: &Path, files: &[(&str, &str)]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for (name, contents) in files {
        std::fs::write(dir.join(name), contents)?;
    }
    Ok(())
}

/// Poll `check` every 100ms for up to 5 seconds
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}
