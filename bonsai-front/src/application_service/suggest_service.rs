//! Page title suggestions for the admin tag editor.

use crate::domain::page::PageType;
use crate::port::page_repository::PageRepository;
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

/// Maximum number of suggestions returned per query.
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSuggestion {
    pub id: String,
    pub title: String,
}

pub struct SuggestService<R> {
    repository: Arc<R>,
}

impl<R: PageRepository> SuggestService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Pages whose title contains `query`, ignoring case.
    ///
    /// An empty `types` slice accepts every page type; an empty query matches
    /// every title. Results are sorted by title.
    pub async fn suggest(&self, query: &str, types: &[PageType]) -> Result<Vec<PageSuggestion>> {
        let needle = query.trim().to_lowercase();

        let mut matches: Vec<_> = self
            .repository
            .list_pages()
            .await?
            .into_iter()
            .filter(|page| types.is_empty() || types.contains(&page.page_type))
            .filter(|page| page.title.to_lowercase().contains(&needle))
            .map(|page| PageSuggestion {
                id: page.key.into_inner(),
                title: page.title,
            })
            .collect();

        matches.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(MAX_SUGGESTIONS);

        tracing::debug!("Suggested {} pages for {:?}", matches.len(), query);
        Ok(matches)
    }
}
