//! [`ContentStore`] backed by the sea-orm entities in [`crate::entity`].

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use common::content::{
    Category, CategoryId, ContentStore, ContentStoreError, Entry, EntryFilter, EntryId,
    EntryStatus, NewEntry,
};
use common::naming::slugify;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, entry, entry_meta, entry_tag, tag};

#[derive(Clone)]
pub struct SqlContentStore {
    db: DatabaseConnection,
}

impl SqlContentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn backend(err: DbErr) -> ContentStoreError {
    ContentStoreError::Backend(err.to_string())
}

/// Map an external ID onto the database's key type. IDs that do not fit
/// cannot exist.
fn db_id(id: i64, what: &str) -> Result<i32, ContentStoreError> {
    i32::try_from(id).map_err(|_| ContentStoreError::NotFound(format!("{what} {id}")))
}

impl From<category::Model> for Category {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id.into(),
            name: model.name,
            slug: model.slug,
        }
    }
}

async fn find_entry<C: ConnectionTrait>(db: &C, id: i64) -> Result<entry::Model, ContentStoreError> {
    entry::Entity::find_by_id(db_id(id, "entry")?)
        .one(db)
        .await
        .map_err(backend)?
        .ok_or_else(|| ContentStoreError::NotFound(format!("entry {id}")))
}

/// Tag slugs per entry, each list in attachment order.
async fn tags_by_entry<C: ConnectionTrait>(
    db: &C,
    entry_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, DbErr> {
    let links = entry_tag::Entity::find()
        .filter(entry_tag::Column::EntryId.is_in(entry_ids.iter().copied()))
        .order_by_asc(entry_tag::Column::EntryId)
        .order_by_asc(entry_tag::Column::Position)
        .all(db)
        .await?;

    let tag_ids: HashSet<i32> = links.iter().map(|l| l.tag_id).collect();
    let slugs: HashMap<i32, String> = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.slug))
        .collect();

    let mut by_entry: HashMap<i32, Vec<String>> = HashMap::new();
    for link in links {
        if let Some(slug) = slugs.get(&link.tag_id) {
            by_entry.entry(link.entry_id).or_default().push(slug.clone());
        }
    }
    Ok(by_entry)
}

/// Attach metadata and tags to a batch of entry rows.
async fn hydrate<C: ConnectionTrait>(
    db: &C,
    models: Vec<entry::Model>,
) -> Result<Vec<Entry>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let mut meta: HashMap<i32, BTreeMap<String, String>> = HashMap::new();
    for row in entry_meta::Entity::find()
        .filter(entry_meta::Column::EntryId.is_in(ids.iter().copied()))
        .order_by_asc(entry_meta::Column::Id)
        .all(db)
        .await?
    {
        meta.entry(row.entry_id)
            .or_default()
            .insert(row.meta_key, row.meta_value);
    }

    let mut tags = tags_by_entry(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| Entry {
            id: m.id.into(),
            status: EntryStatus::parse(&m.status).unwrap_or_default(),
            category_id: m.category_id.into(),
            meta: meta.remove(&m.id).unwrap_or_default(),
            tags: tags.remove(&m.id).unwrap_or_default(),
            title: m.title,
            content: m.content,
            created_at: m.created_at,
        })
        .collect())
}

/// Look up a tag by slug, creating it if needed.
async fn ensure_tag<C: ConnectionTrait>(db: &C, slug: &str) -> Result<tag::Model, DbErr> {
    let model = tag::ActiveModel {
        slug: Set(slug.to_string()),
        ..Default::default()
    };

    let result = tag::Entity::insert(model)
        .on_conflict(OnConflict::column(tag::Column::Slug).do_nothing().to_owned())
        .exec_without_returning(db)
        .await;
    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    tag::Entity::find()
        .filter(tag::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("tag {slug}")))
}

#[async_trait]
impl ContentStore for SqlContentStore {
    #[instrument(skip(self))]
    async fn ensure_category(&self, name: &str) -> Result<Category, ContentStoreError> {
        let slug = slugify(name);
        let existing = category::Entity::find()
            .filter(
                Condition::any()
                    .add(category::Column::Slug.eq(slug.as_str()))
                    .add(category::Column::Name.eq(name)),
            )
            .one(&self.db)
            .await
            .map_err(backend)?;
        if let Some(model) = existing {
            return Ok(model.into());
        }

        let model = category::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug.clone()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        // A concurrent upload may have created it in the meantime.
        let result = category::Entity::insert(model)
            .on_conflict(
                OnConflict::column(category::Column::Slug)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;
        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(backend(e)),
        }

        category::Entity::find()
            .filter(category::Column::Slug.eq(slug.as_str()))
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Into::into)
            .ok_or_else(|| ContentStoreError::NotFound(format!("category {slug}")))
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, ContentStoreError> {
        Ok(category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(Into::into))
    }

    #[instrument(skip(self, new_entry), fields(title = %new_entry.title))]
    async fn create_entry(&self, new_entry: NewEntry) -> Result<EntryId, ContentStoreError> {
        let category_id = db_id(new_entry.category_id, "category")?;
        if category::Entity::find_by_id(category_id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .is_none()
        {
            return Err(ContentStoreError::NotFound(format!(
                "category {category_id}"
            )));
        }

        let txn = self.db.begin().await.map_err(backend)?;

        let model = entry::ActiveModel {
            title: Set(new_entry.title),
            content: Set(new_entry.content),
            status: Set(new_entry.status.as_str().to_string()),
            category_id: Set(category_id),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(backend)?;

        for (key, value) in new_entry.meta {
            entry_meta::ActiveModel {
                entry_id: Set(model.id),
                meta_key: Set(key),
                meta_value: Set(value),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(backend)?;
        }

        txn.commit().await.map_err(backend)?;
        Ok(model.id.into())
    }

    #[instrument(skip(self, tags), fields(count = tags.len()))]
    async fn add_tags(&self, id: EntryId, tags: &[String]) -> Result<usize, ContentStoreError> {
        let txn = self.db.begin().await.map_err(backend)?;
        let entry = find_entry(&txn, id).await?;

        let existing = entry_tag::Entity::find()
            .filter(entry_tag::Column::EntryId.eq(entry.id))
            .all(&txn)
            .await
            .map_err(backend)?;
        let mut attached: HashSet<i32> = existing.iter().map(|l| l.tag_id).collect();
        let mut position = existing.iter().map(|l| l.position + 1).max().unwrap_or(0);

        let mut added = 0;
        for slug in tags.iter().filter(|s| !s.is_empty()) {
            let tag = ensure_tag(&txn, slug).await.map_err(backend)?;
            if !attached.insert(tag.id) {
                continue;
            }

            entry_tag::ActiveModel {
                entry_id: Set(entry.id),
                tag_id: Set(tag.id),
                position: Set(position),
            }
            .insert(&txn)
            .await
            .map_err(backend)?;

            position += 1;
            added += 1;
        }

        txn.commit().await.map_err(backend)?;
        Ok(added)
    }

    async fn entry_tags(&self, id: EntryId) -> Result<Vec<String>, ContentStoreError> {
        let entry = find_entry(&self.db, id).await?;
        let mut tags = tags_by_entry(&self.db, &[entry.id]).await.map_err(backend)?;
        Ok(tags.remove(&entry.id).unwrap_or_default())
    }

    async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, ContentStoreError> {
        let Ok(db_id) = i32::try_from(id) else {
            return Ok(None);
        };
        let Some(model) = entry::Entity::find_by_id(db_id)
            .one(&self.db)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };

        Ok(hydrate(&self.db, vec![model])
            .await
            .map_err(backend)?
            .into_iter()
            .next())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ContentStoreError> {
        Ok(category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>, ContentStoreError> {
        let mut select = entry::Entity::find().order_by_asc(entry::Column::Id);
        if let Some(category_id) = filter.category_id {
            let Ok(category_id) = i32::try_from(category_id) else {
                return Ok(Vec::new());
            };
            select = select.filter(entry::Column::CategoryId.eq(category_id));
        }

        let models = select.all(&self.db).await.map_err(backend)?;
        hydrate(&self.db, models).await.map_err(backend)
    }
}
