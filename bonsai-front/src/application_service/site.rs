//! Bonsai site - assembles storage, services and the HTTP server.

use crate::application_service::media_import_service::MediaImportService;
use crate::application_service::page_presenter::StorePagePresenter;
use crate::application_service::page_request_handler::PageRequestHandler;
use crate::application_service::seed::ensure_seeded;
use crate::application_service::suggest_service::SuggestService;
use crate::config::SiteConfig;
use crate::infrastructure::media_handlers::MediaHandlerRegistry;
use crate::infrastructure::persistence::SledPageRepository;
use crate::port::page_repository::PageRepository;
use crate::presentation::http_api::{create_router, AppState, SiteServices};
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;

/// Bonsai site instance.
pub struct BonsaiSite {
    config: SiteConfig,
    state: AppState,
    repository: Arc<SledPageRepository>,
    media_import: MediaImportService<SledPageRepository>,
}

impl BonsaiSite {
    /// Create a new site with the given configuration.
    pub async fn new(config: SiteConfig) -> Result<Self> {
        // Ensure data directory exists
        std::fs::create_dir_all(&config.storage.data_dir)
            .context("Failed to create data directory")?;

        let repository = Arc::new(
            SledPageRepository::open(config.storage.data_dir.join("pages"))
                .context("Failed to open page repository")?,
        );

        if config.should_seed() {
            ensure_seeded(repository.as_ref())
                .await
                .context("Failed to seed demo pages")?;
        }

        let presenter = StorePagePresenter::new(repository.clone());
        let state = Arc::new(SiteServices {
            pages: PageRequestHandler::new(presenter),
            suggestions: SuggestService::new(repository.clone()),
            repository: repository.clone(),
        });

        let handlers = Arc::new(MediaHandlerRegistry::with_default_handlers());
        let media_import = MediaImportService::new(repository.clone(), handlers);

        Ok(Self {
            config,
            state,
            repository,
            media_import,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<SledPageRepository> {
        &self.repository
    }

    pub fn media_import(&self) -> &MediaImportService<SledPageRepository> {
        &self.media_import
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Serve HTTP until Ctrl-C, then flush the store.
    pub async fn run(&self) -> Result<()> {
        tracing::info!(
            "Starting Bonsai ({}) on {}",
            self.config.environment,
            self.config.server.listen
        );

        let listener = tokio::net::TcpListener::bind(&self.config.server.listen)
            .await
            .context("Failed to bind HTTP listener")?;

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        tracing::info!("Shutting down");
        self.repository.flush().await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
