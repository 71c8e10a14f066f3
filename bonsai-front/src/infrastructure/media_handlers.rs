//! Media handlers for uploaded files.

use crate::domain::media::MediaType;
use crate::port::media_handler::{MediaError, MediaHandler};
use std::path::Path;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Handler for photos. Photos need no encoding, and the image itself is the
/// thumbnail source.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhotoMediaHandler;

impl PhotoMediaHandler {
    const SUPPORTED_MIME_TYPES: &'static [&'static str] = &["image/jpeg", "image/png"];
}

impl MediaHandler for PhotoMediaHandler {
    fn is_immediate(&self) -> bool {
        true
    }

    fn supported_mime_types(&self) -> &[&'static str] {
        Self::SUPPORTED_MIME_TYPES
    }

    fn media_type(&self) -> MediaType {
        MediaType::Photo
    }

    fn extract_thumbnail(&self, path: &Path, mime: &str) -> Result<Vec<u8>, MediaError> {
        let signature = match mime.to_ascii_lowercase().as_str() {
            "image/png" => PNG_SIGNATURE,
            "image/jpeg" => JPEG_SIGNATURE,
            _ => return Err(MediaError::UnsupportedMimeType(mime.to_string())),
        };

        let bytes = std::fs::read(path).map_err(|source| MediaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if !bytes.starts_with(signature) {
            return Err(MediaError::InvalidImage {
                path: path.to_path_buf(),
                mime: mime.to_string(),
            });
        }

        Ok(bytes)
    }
}

/// Looks up the handler responsible for a MIME type.
pub struct MediaHandlerRegistry {
    handlers: Vec<Box<dyn MediaHandler>>,
}

impl MediaHandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registry with every built-in handler.
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        registry.register(PhotoMediaHandler);
        registry
    }

    pub fn register<H: MediaHandler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }

    pub fn handler_for(&self, mime: &str) -> Result<&dyn MediaHandler, MediaError> {
        self.handlers
            .iter()
            .find(|h| h.supports(mime))
            .map(|h| &**h)
            .ok_or_else(|| MediaError::UnsupportedMimeType(mime.to_string()))
    }

    pub fn supported_mime_types(&self) -> Vec<&'static str> {
        self.handlers
            .iter()
            .flat_map(|h| h.supported_mime_types().iter().copied())
            .collect()
    }
}

impl Default for MediaHandlerRegistry {
    fn default() -> Self {
        Self::with_default_handlers()
    }
}
