//! Imports uploaded media files into the page store.

use crate::domain::current_timestamp;
use crate::domain::media::Media;
use crate::domain::page_key::encode_title;
use crate::infrastructure::media_handlers::MediaHandlerRegistry;
use crate::port::page_repository::PageRepository;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct MediaImportRequest {
    pub path: PathBuf,
    pub mime_type: String,
    pub title: String,
    /// Pages the media depicts; keys are canonicalized before lookup.
    pub pages: Vec<String>,
}

pub struct MediaImportService<R> {
    repository: Arc<R>,
    handlers: Arc<MediaHandlerRegistry>,
}

impl<R: PageRepository> MediaImportService<R> {
    pub fn new(repository: Arc<R>, handlers: Arc<MediaHandlerRegistry>) -> Self {
        Self {
            repository,
            handlers,
        }
    }

    /// Store a media file and attach it to the listed pages.
    ///
    /// Every page must exist; nothing is written otherwise.
    pub async fn import(&self, request: MediaImportRequest) -> Result<Media> {
        let handler = self.handlers.handler_for(&request.mime_type)?;

        let mut pages = Vec::with_capacity(request.pages.len());
        for raw_key in &request.pages {
            let key = encode_title(raw_key);
            let page = self
                .repository
                .get_page(&key)
                .await?
                .ok_or_else(|| anyhow!("Page not found: {}", key))?;
            pages.push(page);
        }

        let thumbnail = handler
            .extract_thumbnail(&request.path, &request.mime_type)
            .with_context(|| format!("Failed to import {}", request.path.display()))?;

        let media = Media {
            key: uuid::Uuid::new_v4().simple().to_string(),
            media_type: handler.media_type(),
            mime_type: request.mime_type.to_ascii_lowercase(),
            title: request.title.trim().to_string(),
            is_processed: handler.is_immediate(),
            uploaded_at: current_timestamp(),
        };
        self.repository.save_media(&media, &thumbnail).await?;

        for mut page in pages {
            page.attach_media(&media.key);
            self.repository.save_page(&page).await?;
        }
        self.repository.flush().await?;

        tracing::info!(
            "Imported {:?} media {} attached to {} pages",
            media.media_type,
            media.key,
            request.pages.len()
        );
        Ok(media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::MediaType;
    use crate::domain::page::{Page, PageType};
    use crate::domain::page_key::PageKey;
    use crate::test_utils::MockPageRepository;
    use tempfile::TempDir;

    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    async fn setup() -> (
        MediaImportService<MockPageRepository>,
        Arc<MockPageRepository>,
        TempDir,
    ) {
        let repository = Arc::new(
            MockPageRepository::new()
                .with_pages(vec![Page::new("John Doe", PageType::Person)])
                .await,
        );
        let service = MediaImportService::new(
            repository.clone(),
            Arc::new(MediaHandlerRegistry::with_default_handlers()),
        );
        (service, repository, TempDir::new().unwrap())
    }

    fn request(dir: &TempDir, mime: &str, pages: &[&str]) -> MediaImportRequest {
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, JPEG_BYTES).unwrap();
        MediaImportRequest {
            path,
            mime_type: mime.to_string(),
            title: " Portrait ".to_string(),
            pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_import_photo_attaches_to_pages() {
        let (service, repository, dir) = setup().await;

        let media = service
            .import(request(&dir, "image/jpeg", &["John Doe"]))
            .await
            .unwrap();

        assert_eq!(media.media_type, MediaType::Photo);
        assert_eq!(media.title, "Portrait");
        assert!(media.is_processed);
        assert_eq!(
            repository.get_thumbnail(&media.key).await.unwrap(),
            Some(JPEG_BYTES.to_vec())
        );

        let page = repository
            .get_page(&PageKey::from("John_Doe"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.media, vec![media.key]);
    }

    #[tokio::test]
    async fn test_import_rejects_unsupported_type() {
        let (service, repository, dir) = setup().await;

        let err = service
            .import(request(&dir, "video/mp4", &["John_Doe"]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Unsupported media type"));
        assert!(repository.media.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_import_requires_existing_pages() {
        let (service, repository, dir) = setup().await;

        let err = service
            .import(request(&dir, "image/jpeg", &["John_Doe", "Nobody"]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Page not found: Nobody"));
        assert!(repository.media.lock().await.is_empty());
    }
}
