use async_trait::async_trait;

use super::error::ContentStoreError;
use super::model::{Category, Entry, EntryFilter, EntryId, NewEntry};

/// Category, entry and tag storage used by the upload pipeline.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Return the category whose slug or name matches `name`, creating it if
    /// neither exists. Calling this twice with the same name yields the same
    /// category.
    async fn ensure_category(&self, name: &str) -> Result<Category, ContentStoreError>;

    /// Look up a category by its slug.
    async fn find_category_by_slug(&self, slug: &str)
    -> Result<Option<Category>, ContentStoreError>;

    /// Create a content entry and return its ID.
    async fn create_entry(&self, entry: NewEntry) -> Result<EntryId, ContentStoreError>;

    /// Append tag slugs to an entry. Tags already attached are ignored.
    ///
    /// Returns the number of tags newly attached.
    async fn add_tags(&self, id: EntryId, tags: &[String]) -> Result<usize, ContentStoreError>;

    /// Tag slugs attached to an entry, in attachment order.
    async fn entry_tags(&self, id: EntryId) -> Result<Vec<String>, ContentStoreError>;

    async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, ContentStoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ContentStoreError>;

    /// Entries matching `filter`, oldest first.
    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>, ContentStoreError>;
}
