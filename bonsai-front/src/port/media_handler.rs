//! Media handler trait - per-format thumbnail extraction.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::media::MediaType;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMimeType(String),

    #[error("Failed to read media file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {path} is not a valid {mime} image")]
    InvalidImage { path: PathBuf, mime: String },
}

/// Handles one family of uploaded media files.
pub trait MediaHandler: Send + Sync {
    /// True when the media is usable right after upload, without encoding.
    fn is_immediate(&self) -> bool;

    fn supported_mime_types(&self) -> &[&'static str];

    /// Media type assigned to files handled here.
    fn media_type(&self) -> MediaType;

    /// Produce the image bytes a thumbnail is generated from.
    fn extract_thumbnail(&self, path: &Path, mime: &str) -> Result<Vec<u8>, MediaError>;

    fn supports(&self, mime: &str) -> bool {
        self.supported_mime_types()
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime))
    }
}
