//! Demo content for development sites.

use crate::domain::page::{Page, PageType};
use crate::domain::page_key::PageKey;
use crate::port::page_repository::PageRepository;
use anyhow::Result;

/// Fill an empty store with demo pages. Returns false if pages already exist.
///
/// The demo set includes a page created as "Old Name" and renamed to
/// "New Name", so the old key exercises the rename redirect.
pub async fn ensure_seeded<R: PageRepository>(repository: &R) -> Result<bool> {
    if !repository.list_pages().await?.is_empty() {
        return Ok(false);
    }

    let pages = [
        Page::new("John Doe", PageType::Person)
            .with_description("John is the founder of the family tree.")
            .with_fact("Birth date", "1921.03.14")
            .with_fact("Birth place", "Springfield"),
        Page::new("Jane Doe", PageType::Person)
            .with_description("Jane married John in 1947.")
            .with_fact("Birth date", "1925.??.??"),
        Page::new("Rex", PageType::Pet).with_description("The family dog."),
        Page::new("Wedding of John and Jane", PageType::Event)
            .with_description("Held in Springfield in the summer of 1947."),
        Page::new("Springfield", PageType::Location)
            .with_description("Home town of the Doe family."),
        Page::new("Old Name", PageType::Other).with_description("A page that was renamed."),
    ];

    for page in &pages {
        repository.save_page(page).await?;
    }
    repository
        .rename_page(&PageKey::from("Old_Name"), "New Name")
        .await?;
    repository.flush().await?;

    tracing::info!("Seeded {} demo pages", pages.len());
    Ok(true)
}
