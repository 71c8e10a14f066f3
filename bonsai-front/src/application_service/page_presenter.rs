//! Presenter backed by the page repository.

use crate::domain::page::Page;
use crate::domain::page_key::PageKey;
use crate::domain::views::{DescriptionView, MediaView};
use crate::port::page_presenter::{PagePresenter, PresenterError, PresenterOutcome};
use crate::port::page_repository::PageRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Where a requested key leads.
enum Resolution {
    Found(Page),
    Moved(PageKey),
}

pub struct StorePagePresenter<R> {
    repository: Arc<R>,
}

impl<R: PageRepository> StorePagePresenter<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Exact key first, then the alias of the lowercased key.
    async fn resolve(&self, key: &PageKey) -> Result<Resolution, PresenterError> {
        if let Some(page) = self.repository.get_page(key).await.map_err(unavailable)? {
            return Ok(Resolution::Found(page));
        }

        let target = self
            .repository
            .resolve_alias(&key.alias_key())
            .await
            .map_err(unavailable)?;

        match target {
            Some(target) if target != *key => {
                // Stale aliases of deleted pages are treated as missing.
                let exists = self
                    .repository
                    .get_page(&target)
                    .await
                    .map_err(unavailable)?
                    .is_some();
                if exists {
                    Ok(Resolution::Moved(target))
                } else {
                    Err(PresenterError::NotFound(key.to_string()))
                }
            }
            _ => Err(PresenterError::NotFound(key.to_string())),
        }
    }
}

fn unavailable(e: anyhow::Error) -> PresenterError {
    tracing::warn!("Page storage error: {:#}", e);
    PresenterError::Unavailable(e.to_string())
}

#[async_trait]
impl<R: PageRepository> PagePresenter for StorePagePresenter<R> {
    async fn get_description(&self, key: &PageKey) -> PresenterOutcome<DescriptionView> {
        match self.resolve(key).await {
            Ok(Resolution::Found(page)) => PresenterOutcome::Rendered(DescriptionView::from(&page)),
            Ok(Resolution::Moved(target)) => PresenterOutcome::RedirectTo(target),
            Err(e) => PresenterOutcome::Failed(e),
        }
    }

    async fn get_media(&self, key: &PageKey) -> PresenterOutcome<MediaView> {
        let page = match self.resolve(key).await {
            Ok(Resolution::Found(page)) => page,
            Ok(Resolution::Moved(target)) => return PresenterOutcome::RedirectTo(target),
            Err(e) => return PresenterOutcome::Failed(e),
        };

        let mut media = Vec::with_capacity(page.media.len());
        for media_key in &page.media {
            match self.repository.get_media(media_key).await {
                Ok(Some(m)) => media.push(m),
                Ok(None) => tracing::warn!("Page {} references missing media {}", page.key, media_key),
                Err(e) => return PresenterOutcome::Failed(unavailable(e)),
            }
        }

        PresenterOutcome::Rendered(MediaView::from_page(&page, &media))
    }
}
