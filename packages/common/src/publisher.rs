use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::content::{
    CategoryId, ContentStore, EntryId, EntryStatus, META_FILE_NAME, META_UPLOAD_DIRECTORY,
    NewEntry,
};
use crate::filename::split_extension;
use crate::naming::{format_title, slugify};
use crate::synonym::Enricher;

/// Extension of the image files turned into entries.
pub const IMAGE_EXTENSION: &str = "png";

/// Result of publishing a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    Created {
        entry_id: EntryId,
        title: String,
        file_name: String,
        tags_added: usize,
    },
    /// The category could not be resolved; the image was skipped.
    CategoryMissing { title: String, file_name: String },
    /// The store refused to create the entry.
    Failed {
        title: String,
        file_name: String,
        error: String,
    },
}

impl EntryOutcome {
    pub fn title(&self) -> &str {
        match self {
            Self::Created { title, .. }
            | Self::CategoryMissing { title, .. }
            | Self::Failed { title, .. } => title,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Turns extracted images into published entries.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ContentStore>,
    enricher: Enricher,
}

impl Publisher {
    pub fn new(store: Arc<dyn ContentStore>, enricher: Enricher) -> Self {
        Self { store, enricher }
    }

    /// Create one published entry per PNG directly inside `dir`.
    ///
    /// Images are processed one at a time in lexical file-name order. A failed
    /// image never stops the batch and nothing is rolled back.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub async fn publish(
        &self,
        dir: &Path,
        category_label: &str,
        base_name: &str,
    ) -> Vec<EntryOutcome> {
        let images = match list_images(dir).await {
            Ok(images) => images,
            Err(e) => {
                warn!(error = %e, "Could not read image directory");
                return Vec::new();
            }
        };

        info!(count = images.len(), "Publishing images");

        let mut outcomes = Vec::with_capacity(images.len());
        for image in images {
            outcomes.push(self.publish_one(&image, category_label, base_name).await);
        }
        outcomes
    }

    async fn publish_one(&self, image: &Path, category_label: &str, base_name: &str) -> EntryOutcome {
        let file_name = image
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let title = format_title(&file_name);

        let Some(category_id) = self.resolve_category(category_label).await else {
            warn!(title = %title, "Category not found, skipping image");
            return EntryOutcome::CategoryMissing { title, file_name };
        };

        let new_entry = NewEntry {
            title: title.clone(),
            content: String::new(),
            status: EntryStatus::Publish,
            category_id,
            meta: vec![
                (META_UPLOAD_DIRECTORY.to_string(), base_name.to_string()),
                (META_FILE_NAME.to_string(), file_name.clone()),
            ],
        };

        match self.store.create_entry(new_entry).await {
            Ok(entry_id) => {
                info!(entry_id, title = %title, "Entry created");
                let tags_added = self.enricher.enrich(entry_id, &title).await;
                EntryOutcome::Created {
                    entry_id,
                    title,
                    file_name,
                    tags_added,
                }
            }
            Err(e) => {
                warn!(title = %title, error = %e, "Failed to create entry");
                EntryOutcome::Failed {
                    title,
                    file_name,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn resolve_category(&self, label: &str) -> Option<CategoryId> {
        match self.store.find_category_by_slug(&slugify(label)).await {
            Ok(category) => category.map(|c| c.id),
            Err(e) => {
                warn!(label, error = %e, "Category lookup failed");
                None
            }
        }
    }
}

/// PNG files directly inside `dir`, sorted by file name.
///
/// A missing directory is treated as empty.
pub async fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut read_dir = match fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut images = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_image = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(split_extension)
            .is_some_and(|(_, ext)| ext == IMAGE_EXTENSION);
        if is_image {
            images.push(path);
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}
