use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::content::{Category, Entry, EntryFilter};
use serde::{Deserialize, Serialize};

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Space Rockets")]
    pub name: String,
    #[schema(example = "space-rockets")]
    pub slug: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
    pub total: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EntryResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Rocket Ship")]
    pub title: String,
    pub content: String,
    /// Always `publish`.
    #[schema(example = "publish")]
    pub status: String,
    pub category_id: i64,
    /// Entry metadata, e.g. `upload_directory` and `file_name`.
    pub meta: BTreeMap<String, String>,
    /// Tag slugs in attachment order.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            status: entry.status.as_str().to_string(),
            category_id: entry.category_id,
            meta: entry.meta,
            tags: entry.tags,
            created_at: entry.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EntryListResponse {
    pub entries: Vec<EntryResponse>,
    pub total: u64,
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct EntryListQuery {
    /// Only entries in this category.
    #[param(example = 1)]
    pub category_id: Option<i64>,
}

impl From<EntryListQuery> for EntryFilter {
    fn from(query: EntryListQuery) -> Self {
        Self {
            category_id: query.category_id,
        }
    }
}
