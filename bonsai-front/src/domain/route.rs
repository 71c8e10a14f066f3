//! Public URL layout of page routes.

use super::page_key::PageKey;

/// Target of a page redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRoute {
    Description(PageKey),
    Media(PageKey),
}

impl PageRoute {
    /// Absolute path with the key percent-encoded as a single segment.
    pub fn path(&self) -> String {
        match self {
            PageRoute::Description(key) => format!("/p/{}", urlencoding::encode(key.as_str())),
            PageRoute::Media(key) => format!("/p/{}/media", urlencoding::encode(key.as_str())),
        }
    }
}

pub fn thumbnail_path(media_key: &str) -> String {
    format!("/media/{}/thumbnail", urlencoding::encode(media_key))
}
