//! Domain layer - page keys, stored records and view-models.

pub mod media;
pub mod page;
pub mod page_key;
pub mod route;
pub mod views;

pub use media::{Media, MediaType};
pub use page::{Fact, Page, PageType};
pub use page_key::{decode_title, encode_title, PageKey};
pub use route::PageRoute;
pub use views::{DescriptionView, MediaThumbnailView, MediaView};

/// Current unix time in seconds.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
