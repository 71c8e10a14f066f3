use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Photo,
    Video,
    Document,
}

/// Stored media record. Thumbnail bytes are kept separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub key: String,
    pub media_type: MediaType,
    pub mime_type: String,
    pub title: String,
    /// False while the media still awaits encoding.
    pub is_processed: bool,
    pub uploaded_at: u64,
}
