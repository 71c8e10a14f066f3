use serde::{Deserialize, Serialize};

use super::current_timestamp;
use super::page_key::{encode_title, PageKey};

/// Kind of entity a page describes.
///
/// The numeric codes are used by the suggestion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageType {
    Person,
    Pet,
    Event,
    Location,
    Other,
}

impl PageType {
    pub const ALL: [PageType; 5] = [
        PageType::Person,
        PageType::Pet,
        PageType::Event,
        PageType::Location,
        PageType::Other,
    ];

    pub fn code(self) -> u8 {
        match self {
            PageType::Person => 0,
            PageType::Pet => 1,
            PageType::Event => 2,
            PageType::Location => 3,
            PageType::Other => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub name: String,
    pub value: String,
}

/// Stored page record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub key: PageKey,
    pub title: String,
    pub page_type: PageType,
    /// Markdown source of the page body.
    pub description: String,
    #[serde(default)]
    pub facts: Vec<Fact>,
    /// Keys of attached media, in display order.
    #[serde(default)]
    pub media: Vec<String>,
    pub last_updated: u64,
}

impl Page {
    /// Create an empty page; the key is the encoded title.
    pub fn new(title: &str, page_type: PageType) -> Self {
        Self {
            key: encode_title(title),
            title: title.trim().to_string(),
            page_type,
            description: String::new(),
            facts: Vec::new(),
            media: Vec::new(),
            last_updated: current_timestamp(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_fact(mut self, name: &str, value: &str) -> Self {
        self.facts.push(Fact {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Attach a media key unless it is already attached.
    pub fn attach_media(&mut self, media_key: &str) {
        if !self.media.iter().any(|m| m == media_key) {
            self.media.push(media_key.to_string());
            self.touch();
        }
    }

    pub fn touch(&mut self) {
        self.last_updated = current_timestamp();
    }
}
