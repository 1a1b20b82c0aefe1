use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, instrument, warn};

use crate::archive::{ArchiveError, ExtractOptions, extract_and_remove};
use crate::content::{Category, ContentStore, ContentStoreError};
use crate::naming::{ARCHIVE_EXTENSION, ArchiveName, NamingError};
use crate::publisher::{EntryOutcome, IMAGE_EXTENSION, Publisher};
use crate::synonym::{Enricher, SynonymSource};

/// An archive received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    InvalidFile(#[from] NamingError),

    #[error("failed to prepare category: {0}")]
    Category(#[source] ContentStoreError),

    #[error("failed to store the uploaded file: {0}")]
    Storage(#[source] io::Error),

    #[error("failed to extract the archive: {0}")]
    Extraction(#[source] ArchiveError),
}

/// Everything that happened during one upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub base_name: String,
    pub category: Category,
    pub extracted_files: usize,
    pub entries: Vec<EntryOutcome>,
    /// Non-fatal problems worth showing to the uploader.
    pub warnings: Vec<String>,
}

impl UploadReport {
    pub fn created(&self) -> usize {
        self.entries.iter().filter(|e| e.is_created()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.created()
    }
}

/// Runs the upload pipeline: name parsing, category, extraction, publishing.
pub struct Uploader {
    store: Arc<dyn ContentStore>,
    publisher: Publisher,
    upload_root: PathBuf,
}

impl Uploader {
    pub fn new(
        store: Arc<dyn ContentStore>,
        synonyms: Arc<dyn SynonymSource>,
        upload_root: impl Into<PathBuf>,
    ) -> Self {
        let enricher = Enricher::new(store.clone(), synonyms);
        Self {
            publisher: Publisher::new(store.clone(), enricher),
            store,
            upload_root: upload_root.into(),
        }
    }

    /// Folder the archive named `name` is extracted into.
    pub fn extraction_dir(&self, name: &ArchiveName) -> PathBuf {
        self.upload_root.join(&name.base_name)
    }

    /// Folder scanned for images after extraction.
    pub fn image_dir(&self, name: &ArchiveName) -> PathBuf {
        self.extraction_dir(name).join(IMAGE_EXTENSION)
    }

    #[instrument(skip(self, archive), fields(file_name = %archive.file_name, size = archive.bytes.len()))]
    pub async fn handle(&self, archive: UploadedArchive) -> Result<UploadReport, UploadError> {
        let name = ArchiveName::parse(&archive.file_name)?;

        let mut warnings = Vec::new();
        if name.has_empty_base_name() {
            warn!("Archive name has no '<number>-' prefix, base name is empty");
            warnings.push(format!(
                "'{}' does not follow the '<number>-<name>.zip' convention; \
                 files are extracted directly into the upload folder",
                name.file_name
            ));
        }

        let category = self
            .store
            .ensure_category(&name.category_label)
            .await
            .map_err(UploadError::Category)?;

        let archive_path = self.persist(&name, &archive.bytes).await?;

        let dest = self.extraction_dir(&name);
        // A folder named like the image folder is content, never a wrapper.
        let options = ExtractOptions::default().strip_root(
            [name.base_name.clone(), name.stem.clone()]
                .into_iter()
                .filter(|root| root != IMAGE_EXTENSION),
        );
        let extract_dest = dest.clone();
        let extracted = tokio::task::spawn_blocking(move || {
            extract_and_remove(&archive_path, &extract_dest, &options)
        })
        .await
        .map_err(|e| UploadError::Storage(io::Error::other(e)))?
        .map_err(|e| {
            error!(error = %e, "Archive extraction failed");
            UploadError::Extraction(e)
        })?;

        if extracted.skipped > 0 {
            warnings.push(format!(
                "{} archive entries pointed outside the upload folder and were ignored",
                extracted.skipped
            ));
        }

        info!(
            files = extracted.files,
            dest = %dest.display(),
            "Archive extracted"
        );

        let entries = self
            .publisher
            .publish(&self.image_dir(&name), &name.category_label, &name.base_name)
            .await;

        Ok(UploadReport {
            base_name: name.base_name,
            category,
            extracted_files: extracted.files,
            entries,
            warnings,
        })
    }

    /// Write the uploaded bytes to `<upload_root>/<base_name>.zip`.
    async fn persist(&self, name: &ArchiveName, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        let path = self
            .upload_root
            .join(format!("{}.{ARCHIVE_EXTENSION}", name.base_name));

        let result = async {
            fs::create_dir_all(&self.upload_root).await?;
            fs::write(&path, bytes).await
        }
        .await;

        result.map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to store uploaded archive");
            UploadError::Storage(e)
        })?;

        Ok(path)
    }
}
