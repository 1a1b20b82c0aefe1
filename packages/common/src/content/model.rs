use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type CategoryId = i64;
pub type EntryId = i64;

/// Metadata key holding the archive base name an entry was published from.
pub const META_UPLOAD_DIRECTORY: &str = "upload_directory";

/// Metadata key holding the image's original file stem.
pub const META_FILE_NAME: &str = "file_name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    #[default]
    Publish,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "publish" => Some(Self::Publish),
            _ => None,
        }
    }
}

/// Values for a content entry about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub status: EntryStatus,
    pub category_id: CategoryId,
    /// Entry-scoped key/value pairs, stored in insertion order.
    pub meta: Vec<(String, String)>,
}

/// A stored content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    pub status: EntryStatus,
    pub category_id: CategoryId,
    pub meta: BTreeMap<String, String>,
    /// Tag slugs in attachment order.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryFilter {
    pub category_id: Option<CategoryId>,
}
