//! Presenter contract consumed by the page request handler.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::page_key::PageKey;
use crate::domain::views::{DescriptionView, MediaView};

/// Failure of a presenter call other than a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenterError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Page storage unavailable: {0}")]
    Unavailable(String),
}

/// Result of resolving a canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterOutcome<T> {
    /// The page exists under the requested key.
    Rendered(T),
    /// The page now lives under another key (renamed or merged).
    RedirectTo(PageKey),
    Failed(PresenterError),
}

/// Loads view-models for canonical page keys.
#[async_trait]
pub trait PagePresenter: Send + Sync {
    async fn get_description(&self, key: &PageKey) -> PresenterOutcome<DescriptionView>;

    async fn get_media(&self, key: &PageKey) -> PresenterOutcome<MediaView>;
}
