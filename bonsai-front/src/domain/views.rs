//! View-models handed to the rendering layer.

use serde::Serialize;

use super::media::{Media, MediaType};
use super::page::{Fact, Page, PageType};
use super::page_key::PageKey;
use super::route::thumbnail_path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionView {
    pub key: PageKey,
    pub title: String,
    pub page_type: PageType,
    pub description: String,
    pub facts: Vec<Fact>,
    pub last_updated: u64,
}

impl From<&Page> for DescriptionView {
    fn from(page: &Page) -> Self {
        Self {
            key: page.key.clone(),
            title: page.title.clone(),
            page_type: page.page_type,
            description: page.description.clone(),
            facts: page.facts.clone(),
            last_updated: page.last_updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaThumbnailView {
    pub key: String,
    pub title: String,
    pub media_type: MediaType,
    pub thumbnail_url: String,
}

impl From<&Media> for MediaThumbnailView {
    fn from(media: &Media) -> Self {
        Self {
            key: media.key.clone(),
            title: media.title.clone(),
            media_type: media.media_type,
            thumbnail_url: thumbnail_path(&media.key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaView {
    pub key: PageKey,
    pub title: String,
    pub media: Vec<MediaThumbnailView>,
}

impl MediaView {
    /// Build the view from a page and its loaded media, in the order given.
    /// Media that are not processed yet are left out.
    pub fn from_page<'a>(page: &Page, media: impl IntoIterator<Item = &'a Media>) -> Self {
        Self {
            key: page.key.clone(),
            title: page.title.clone(),
            media: media
                .into_iter()
                .filter(|m| m.is_processed)
                .map(MediaThumbnailView::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(key: &str, processed: bool) -> Media {
        Media {
            key: key.to_string(),
            media_type: MediaType::Photo,
            mime_type: "image/png".to_string(),
            title: format!("Photo {}", key),
            is_processed: processed,
            uploaded_at: 0,
        }
    }

    #[test]
    fn test_description_view_from_page() {
        let page = Page::new("John Doe", PageType::Person)
            .with_description("Born somewhere.")
            .with_fact("Birth date", "1950");
        let view = DescriptionView::from(&page);

        assert_eq!(view.key, "John_Doe");
        assert_eq!(view.title, "John Doe");
        assert_eq!(view.description, "Born somewhere.");
        assert_eq!(view.facts.len(), 1);
    }

    #[test]
    fn test_media_view_skips_unprocessed() {
        let page = Page::new("John Doe", PageType::Person);
        let media = [photo("a", true), photo("b", false), photo("c", true)];
        let view = MediaView::from_page(&page, &media);

        let keys: Vec<_> = view.media.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(view.media[0].thumbnail_url, "/media/a/thumbnail");
    }
}
