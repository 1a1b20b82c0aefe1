use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::error::ContentStoreError;
use super::model::{Category, CategoryId, Entry, EntryFilter, EntryId, NewEntry};
use super::traits::ContentStore;
use crate::naming::slugify;

/// In-process content store.
///
/// Useful for tests and for embedding the uploader without a database.
/// IDs start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryContentStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    categories: BTreeMap<CategoryId, Category>,
    entries: BTreeMap<EntryId, Entry>,
    next_category_id: CategoryId,
    next_entry_id: EntryId,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn ensure_category(&self, name: &str) -> Result<Category, ContentStoreError> {
        let slug = slugify(name);
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .categories
            .values()
            .find(|c| c.slug == slug || c.name == name)
        {
            return Ok(existing.clone());
        }

        inner.next_category_id += 1;
        let category = Category {
            id: inner.next_category_id,
            name: name.to_string(),
            slug,
        };
        inner.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, ContentStoreError> {
        let inner = self.inner.read().await;
        Ok(inner.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<EntryId, ContentStoreError> {
        let mut inner = self.inner.write().await;

        if !inner.categories.contains_key(&entry.category_id) {
            return Err(ContentStoreError::NotFound(format!(
                "category {}",
                entry.category_id
            )));
        }

        inner.next_entry_id += 1;
        let id = inner.next_entry_id;
        inner.entries.insert(
            id,
            Entry {
                id,
                title: entry.title,
                content: entry.content,
                status: entry.status,
                category_id: entry.category_id,
                meta: entry.meta.into_iter().collect(),
                tags: Vec::new(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn add_tags(&self, id: EntryId, tags: &[String]) -> Result<usize, ContentStoreError> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or_else(|| ContentStoreError::NotFound(format!("entry {id}")))?;

        let mut added = 0;
        for tag in tags {
            if tag.is_empty() || entry.tags.contains(tag) {
                continue;
            }
            entry.tags.push(tag.clone());
            added += 1;
        }
        Ok(added)
    }

    async fn entry_tags(&self, id: EntryId) -> Result<Vec<String>, ContentStoreError> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(&id)
            .map(|e| e.tags.clone())
            .ok_or_else(|| ContentStoreError::NotFound(format!("entry {id}")))
    }

    async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, ContentStoreError> {
        Ok(self.inner.read().await.entries.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ContentStoreError> {
        Ok(self.inner.read().await.categories.values().cloned().collect())
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>, ContentStoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .values()
            .filter(|e| filter.category_id.is_none_or(|id| e.category_id == id))
            .cloned()
            .collect())
    }
}
