//! Sled-based page repository implementation.

use crate::domain::media::Media;
use crate::domain::page::Page;
use crate::domain::page_key::{encode_title, PageKey};
use crate::port::page_repository::PageRepository;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional};
use std::path::Path;

const PAGES_TREE_NAME: &str = "pages";
const ALIASES_TREE_NAME: &str = "aliases";
const MEDIA_TREE_NAME: &str = "media";
const THUMBNAILS_TREE_NAME: &str = "thumbnails";

/// Sled-based implementation of PageRepository.
///
/// Pages and media are stored as JSON; aliases map a lowercased key to the
/// raw target key bytes; thumbnails are stored as raw bytes.
pub struct SledPageRepository {
    db: Db,
}

impl SledPageRepository {
    /// Open or create a sled database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref()).context("Failed to open sled database")?;
        Ok(Self { db })
    }

    fn tree(&self, name: &str) -> Result<sled::Tree> {
        self.db
            .open_tree(name)
            .with_context(|| format!("Failed to open {} tree", name))
    }
}

fn abort(error: anyhow::Error) -> ConflictableTransactionError<anyhow::Error> {
    ConflictableTransactionError::Abort(error)
}

#[async_trait]
impl PageRepository for SledPageRepository {
    async fn get_page(&self, key: &PageKey) -> Result<Option<Page>> {
        let tree = self.tree(PAGES_TREE_NAME)?;
        match tree.get(key.as_str().as_bytes())? {
            Some(bytes) => {
                let page: Page =
                    serde_json::from_slice(&bytes).context("Failed to deserialize page")?;
                Ok(Some(page))
            }
            None => Ok(None),
        }
    }

    async fn save_page(&self, page: &Page) -> Result<()> {
        let pages = self.tree(PAGES_TREE_NAME)?;
        let value = serde_json::to_vec(page).context("Failed to serialize page")?;
        pages
            .insert(page.key.as_str().as_bytes(), value)
            .context("Failed to insert page")?;

        let aliases = self.tree(ALIASES_TREE_NAME)?;
        aliases
            .insert(page.key.alias_key().as_bytes(), page.key.as_str().as_bytes())
            .context("Failed to insert page alias")?;
        Ok(())
    }

    async fn delete_page(&self, key: &PageKey) -> Result<()> {
        let tree = self.tree(PAGES_TREE_NAME)?;
        tree.remove(key.as_str().as_bytes())
            .context("Failed to delete page")?;
        Ok(())
    }

    async fn resolve_alias(&self, alias: &str) -> Result<Option<PageKey>> {
        let tree = self.tree(ALIASES_TREE_NAME)?;
        match tree.get(alias.as_bytes())? {
            Some(bytes) => {
                let target = String::from_utf8(bytes.to_vec())
                    .context("Failed to decode alias target as UTF-8")?;
                Ok(Some(PageKey::new(target)))
            }
            None => Ok(None),
        }
    }

    async fn save_alias(&self, alias: &str, target: &PageKey) -> Result<()> {
        let tree = self.tree(ALIASES_TREE_NAME)?;
        tree.insert(alias.as_bytes(), target.as_str().as_bytes())
            .context("Failed to insert alias")?;
        Ok(())
    }

    async fn list_aliases(&self) -> Result<Vec<(String, PageKey)>> {
        let tree = self.tree(ALIASES_TREE_NAME)?;
        let mut aliases = Vec::new();
        for result in tree.iter() {
            let (key, value) = result.context("Failed to iterate aliases")?;
            let alias = String::from_utf8(key.to_vec()).context("Failed to decode alias as UTF-8")?;
            let target = String::from_utf8(value.to_vec())
                .context("Failed to decode alias target as UTF-8")?;
            aliases.push((alias, PageKey::new(target)));
        }
        Ok(aliases)
    }

    async fn list_pages(&self) -> Result<Vec<Page>> {
        let tree = self.tree(PAGES_TREE_NAME)?;
        let mut pages = Vec::new();
        for result in tree.iter() {
            let (_, value) = result.context("Failed to iterate pages")?;
            let page: Page =
                serde_json::from_slice(&value).context("Failed to deserialize page")?;
            pages.push(page);
        }
        Ok(pages)
    }

    async fn get_media(&self, key: &str) -> Result<Option<Media>> {
        let tree = self.tree(MEDIA_TREE_NAME)?;
        match tree.get(key.as_bytes())? {
            Some(bytes) => {
                let media: Media =
                    serde_json::from_slice(&bytes).context("Failed to deserialize media")?;
                Ok(Some(media))
            }
            None => Ok(None),
        }
    }

    async fn save_media(&self, media: &Media, thumbnail: &[u8]) -> Result<()> {
        let tree = self.tree(MEDIA_TREE_NAME)?;
        let value = serde_json::to_vec(media).context("Failed to serialize media")?;
        tree.insert(media.key.as_bytes(), value)
            .context("Failed to insert media")?;

        let thumbnails = self.tree(THUMBNAILS_TREE_NAME)?;
        thumbnails
            .insert(media.key.as_bytes(), thumbnail)
            .context("Failed to insert thumbnail")?;
        Ok(())
    }

    async fn get_thumbnail(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let tree = self.tree(THUMBNAILS_TREE_NAME)?;
        Ok(tree.get(key.as_bytes())?.map(|bytes| bytes.to_vec()))
    }

    async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.context("Failed to flush database")?;
        Ok(())
    }

    /// Rename inside one transaction over the pages and aliases trees, so a
    /// failed rename leaves both untouched.
    async fn rename_page(&self, old: &PageKey, new_title: &str) -> Result<Page> {
        let new_key = encode_title(new_title);
        if new_key.as_str().is_empty() {
            bail!("Page title is empty");
        }

        let pages = self.tree(PAGES_TREE_NAME)?;
        let aliases = self.tree(ALIASES_TREE_NAME)?;

        // Transactional trees cannot be iterated; aliases are re-checked below.
        let mut stale_aliases = Vec::new();
        for result in aliases.iter() {
            let (alias, target) = result.context("Failed to iterate aliases")?;
            if target.as_ref() == old.as_str().as_bytes() {
                stale_aliases.push(alias);
            }
        }

        let result = (&pages, &aliases).transaction(|(tx_pages, tx_aliases)| {
            let bytes = tx_pages
                .get(old.as_str().as_bytes())?
                .ok_or_else(|| abort(anyhow!("Page not found: {}", old)))?;
            let mut page: Page = serde_json::from_slice(&bytes)
                .map_err(|e| abort(anyhow::Error::new(e).context("Failed to deserialize page")))?;
            page.title = new_title.trim().to_string();
            page.touch();

            if new_key != *old {
                if tx_pages.get(new_key.as_str().as_bytes())?.is_some() {
                    return Err(abort(anyhow!("Page already exists: {}", new_key)));
                }
                tx_pages.remove(old.as_str().as_bytes())?;
                page.key = new_key.clone();

                for alias in &stale_aliases {
                    if tx_aliases.get(alias)?.as_deref() == Some(old.as_str().as_bytes()) {
                        tx_aliases.insert(alias.clone(), new_key.as_str().as_bytes())?;
                    }
                }
                tx_aliases.insert(old.alias_key().as_bytes(), new_key.as_str().as_bytes())?;
            }

            let value = serde_json::to_vec(&page)
                .map_err(|e| abort(anyhow::Error::new(e).context("Failed to serialize page")))?;
            tx_pages.insert(new_key.as_str().as_bytes(), value)?;
            tx_aliases.insert(new_key.alias_key().as_bytes(), new_key.as_str().as_bytes())?;
            Ok(page)
        });

        match result {
            Ok(page) => Ok(page),
            Err(TransactionError::Abort(e)) => Err(e),
            Err(TransactionError::Storage(e)) => {
                Err(anyhow::Error::new(e).context("Failed to rename page"))
            }
        }
    }
}
