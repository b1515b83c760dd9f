//! Shared utilities for integration testing.

use std::time::Duration;

use page_editor::config::{ServiceConfig, StorageBackend};
use page_editor::lifecycle::{startup, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running service on an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub shutdown: Shutdown,
    pub data: TempDir,
    handle: JoinHandle<Result<(), startup::StartupError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .unwrap()
            .unwrap();
    }
}

/// Default configuration with storage placed in a fresh temp directory.
pub fn config_for(backend: StorageBackend, data: &TempDir) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.storage.backend = backend;
    config.storage.data_dir = data.path().join("pages");
    config.storage.database_url = format!("sqlite://{}", data.path().join("pages.db").display());
    config
}

/// Start the service with the given backend and defaults otherwise.
pub async fn start(backend: StorageBackend) -> TestServer {
    let data = tempfile::tempdir().unwrap();
    let config = config_for(backend, &data);
    start_with(config, data).await
}

/// Start the service with an explicit configuration.
pub async fn start_with(config: ServiceConfig, data: TempDir) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(startup::serve(config, listener, shutdown.subscribe()));

    TestServer {
        base_url,
        shutdown,
        data,
        handle,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}
