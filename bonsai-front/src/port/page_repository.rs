//! Page storage trait.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::domain::media::Media;
use crate::domain::page::Page;
use crate::domain::page_key::{encode_title, PageKey};

/// Abstract interface for page, alias and media persistence.
///
/// Aliases map the lowercased form of a key to the key of the page it now
/// denotes. `save_page` always records the page's own alias.
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Get a page by its exact key.
    async fn get_page(&self, key: &PageKey) -> Result<Option<Page>>;

    /// Insert or replace a page and its own alias.
    async fn save_page(&self, page: &Page) -> Result<()>;

    /// Delete a page record. Aliases are left in place.
    async fn delete_page(&self, key: &PageKey) -> Result<()>;

    /// Look up the page key an alias points at.
    async fn resolve_alias(&self, alias: &str) -> Result<Option<PageKey>>;

    async fn save_alias(&self, alias: &str, target: &PageKey) -> Result<()>;

    async fn list_aliases(&self) -> Result<Vec<(String, PageKey)>>;

    async fn list_pages(&self) -> Result<Vec<Page>>;

    async fn get_media(&self, key: &str) -> Result<Option<Media>>;

    /// Insert or replace a media record together with its thumbnail.
    async fn save_media(&self, media: &Media, thumbnail: &[u8]) -> Result<()>;

    async fn get_thumbnail(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Flush pending writes to disk.
    async fn flush(&self) -> Result<()>;

    /// Move a page to the key of `new_title`.
    ///
    /// Every alias that pointed at the old key is re-pointed, and the old key
    /// becomes an alias of the new one, so stale links resolve to a redirect.
    /// This default issues separate writes; stores with transactions override
    /// it to rename atomically.
    async fn rename_page(&self, old: &PageKey, new_title: &str) -> Result<Page> {
        let mut page = self
            .get_page(old)
            .await?
            .ok_or_else(|| anyhow!("Page not found: {}", old))?;

        let new_key = encode_title(new_title);
        if new_key.as_str().is_empty() {
            bail!("Page title is empty");
        }

        page.title = new_title.trim().to_string();
        page.touch();

        if new_key == *old {
            self.save_page(&page).await?;
            return Ok(page);
        }

        if self.get_page(&new_key).await?.is_some() {
            bail!("Page already exists: {}", new_key);
        }

        page.key = new_key.clone();
        self.save_page(&page).await?;
        self.delete_page(old).await?;

        for (alias, target) in self.list_aliases().await? {
            if target == *old {
                self.save_alias(&alias, &new_key).await?;
            }
        }
        self.save_alias(&old.alias_key(), &new_key).await?;

        Ok(page)
    }
}
