//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration, falling back to defaults
//! - Build the renderer from the template settings
//! - Open the configured page store
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The backend is picked once; the server is monomorphized per store

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ServiceConfig, StorageBackend, TemplateConfig};
use crate::http::HttpServer;
use crate::lifecycle::ShutdownListener;
use crate::render::{RenderError, Renderer, TemplateRenderer};
use crate::service::PageService;
use crate::store::{FileStore, PageStore, RelationalStore, StoreError};

/// Errors that abort startup or serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open page store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to load templates: {0}")]
    Render(#[from] RenderError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Configuration from `path`, or the defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<ServiceConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(ServiceConfig::default()),
    }
}

/// Templates from the configured directory, or the built-in set.
pub fn build_renderer(config: &TemplateConfig) -> Result<Arc<dyn Renderer>, RenderError> {
    let renderer = match &config.dir {
        Some(dir) => TemplateRenderer::from_dir(dir)?,
        None => TemplateRenderer::builtin()?,
    };
    Ok(Arc::new(renderer))
}

/// Bind the configured address and serve until shutdown.
pub async fn run(config: ServiceConfig, shutdown: ShutdownListener) -> Result<(), StartupError> {
    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    serve(config, listener, shutdown).await
}

/// Open the configured store and serve on an already bound listener.
pub async fn serve(
    config: ServiceConfig,
    listener: TcpListener,
    shutdown: ShutdownListener,
) -> Result<(), StartupError> {
    match config.storage.backend {
        StorageBackend::File => {
            let store =
                FileStore::open(&config.storage.data_dir, config.storage.on_title_collision)
                    .await?;
            serve_with(store, &config, listener, shutdown).await
        }
        StorageBackend::Sqlite => {
            let store = RelationalStore::connect(
                &config.storage.database_url,
                config.storage.max_connections,
            )
            .await?;
            serve_with(store, &config, listener, shutdown).await
        }
    }
}

async fn serve_with<S: PageStore>(
    store: S,
    config: &ServiceConfig,
    listener: TcpListener,
    shutdown: ShutdownListener,
) -> Result<(), StartupError> {
    let renderer = build_renderer(&config.templates)?;
    let service = PageService::new(store, renderer, config.service_name.clone());
    HttpServer::new(service, config)
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}
