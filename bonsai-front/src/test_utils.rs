//! Test utilities and mock implementations for unit testing.
//!
//! This module provides mock implementations of the main traits
//! to enable unit testing without real infrastructure dependencies.

use crate::domain::media::Media;
use crate::domain::page::Page;
use crate::domain::page_key::PageKey;
use crate::domain::views::{DescriptionView, MediaView};
use crate::port::page_presenter::{PagePresenter, PresenterError, PresenterOutcome};
use crate::port::page_repository::PageRepository;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

// ============================================================================
// MockPagePresenter
// ============================================================================

/// Type alias for recorded presenter calls: (operation, key).
pub type PresenterCalls = Arc<Mutex<Vec<(&'static str, PageKey)>>>;

/// Mock implementation of PagePresenter returning scripted outcomes.
pub struct MockPagePresenter {
    pub description: PresenterOutcome<DescriptionView>,
    pub media: PresenterOutcome<MediaView>,
    pub calls: PresenterCalls,
}

impl MockPagePresenter {
    /// Presenter that fails every call with NotFound.
    pub fn new() -> Self {
        Self {
            description: PresenterOutcome::Failed(PresenterError::NotFound("mock".to_string())),
            media: PresenterOutcome::Failed(PresenterError::NotFound("mock".to_string())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_description(self, outcome: PresenterOutcome<DescriptionView>) -> Self {
        Self {
            description: outcome,
            ..self
        }
    }

    pub fn with_media(self, outcome: PresenterOutcome<MediaView>) -> Self {
        Self {
            media: outcome,
            ..self
        }
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockPagePresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PagePresenter for MockPagePresenter {
    async fn get_description(&self, key: &PageKey) -> PresenterOutcome<DescriptionView> {
        self.calls.lock().await.push(("description", key.clone()));
        self.description.clone()
    }

    async fn get_media(&self, key: &PageKey) -> PresenterOutcome<MediaView> {
        self.calls.lock().await.push(("media", key.clone()));
        self.media.clone()
    }
}

// ============================================================================
// MockPageRepository
// ============================================================================

/// In-memory implementation of PageRepository for testing.
#[derive(Default)]
pub struct MockPageRepository {
    pub pages: Arc<Mutex<BTreeMap<String, Page>>>,
    pub aliases: Arc<Mutex<BTreeMap<String, PageKey>>>,
    pub media: Arc<Mutex<HashMap<String, (Media, Vec<u8>)>>>,
    /// When set, every call fails as if storage were down.
    pub unavailable: Arc<AtomicBool>,
}

impl MockPageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_pages(self, pages: Vec<Page>) -> Self {
        for page in pages {
            self.save_page(&page).await.unwrap();
        }
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            bail!("mock storage unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl PageRepository for MockPageRepository {
    async fn get_page(&self, key: &PageKey) -> Result<Option<Page>> {
        self.check()?;
        Ok(self.pages.lock().await.get(key.as_str()).cloned())
    }

    async fn save_page(&self, page: &Page) -> Result<()> {
        self.check()?;
        self.pages
            .lock()
            .await
            .insert(page.key.as_str().to_string(), page.clone());
        self.aliases
            .lock()
            .await
            .insert(page.key.alias_key(), page.key.clone());
        Ok(())
    }

    async fn delete_page(&self, key: &PageKey) -> Result<()> {
        self.check()?;
        self.pages.lock().await.remove(key.as_str());
        Ok(())
    }

    async fn resolve_alias(&self, alias: &str) -> Result<Option<PageKey>> {
        self.check()?;
        Ok(self.aliases.lock().await.get(alias).cloned())
    }

    async fn save_alias(&self, alias: &str, target: &PageKey) -> Result<()> {
        self.check()?;
        self.aliases
            .lock()
            .await
            .insert(alias.to_string(), target.clone());
        Ok(())
    }

    async fn list_aliases(&self) -> Result<Vec<(String, PageKey)>> {
        self.check()?;
        Ok(self
            .aliases
            .lock()
            .await
            .iter()
            .map(|(alias, target)| (alias.clone(), target.clone()))
            .collect())
    }

    async fn list_pages(&self) -> Result<Vec<Page>> {
        self.check()?;
        Ok(self.pages.lock().await.values().cloned().collect())
    }

    async fn get_media(&self, key: &str) -> Result<Option<Media>> {
        self.check()?;
        Ok(self.media.lock().await.get(key).map(|(m, _)| m.clone()))
    }

    async fn save_media(&self, media: &Media, thumbnail: &[u8]) -> Result<()> {
        self.check()?;
        self.media
            .lock()
            .await
            .insert(media.key.clone(), (media.clone(), thumbnail.to_vec()));
        Ok(())
    }

    async fn get_thumbnail(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.media.lock().await.get(key).map(|(_, t)| t.clone()))
    }

    async fn flush(&self) -> Result<()> {
        self.check()
    }
}
