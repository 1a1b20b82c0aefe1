use common::publisher::EntryOutcome;
use common::uploader::UploadReport;
use serde::Serialize;

use super::content::CategoryResponse;

/// What happened to a single image.
#[derive(Serialize, utoipa::ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Created,
    CategoryMissing,
    Failed,
}

/// Per-image result of an upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EntryOutcomeResponse {
    pub outcome: OutcomeKind,
    /// Set when the entry was created.
    #[schema(example = 7)]
    pub entry_id: Option<i64>,
    #[schema(example = "Rocket Ship")]
    pub title: String,
    /// Image file stem.
    #[schema(example = "01-rocket-ship")]
    pub file_name: String,
    /// Synonym tags attached to the new entry.
    pub tags_added: usize,
    /// Store error for failed entries.
    pub error: Option<String>,
}

impl From<&EntryOutcome> for EntryOutcomeResponse {
    fn from(outcome: &EntryOutcome) -> Self {
        match outcome {
            EntryOutcome::Created {
                entry_id,
                title,
                file_name,
                tags_added,
            } => Self {
                outcome: OutcomeKind::Created,
                entry_id: Some(*entry_id),
                title: title.clone(),
                file_name: file_name.clone(),
                tags_added: *tags_added,
                error: None,
            },
            EntryOutcome::CategoryMissing { title, file_name } => Self {
                outcome: OutcomeKind::CategoryMissing,
                entry_id: None,
                title: title.clone(),
                file_name: file_name.clone(),
                tags_added: 0,
                error: None,
            },
            EntryOutcome::Failed {
                title,
                file_name,
                error,
            } => Self {
                outcome: OutcomeKind::Failed,
                entry_id: None,
                title: title.clone(),
                file_name: file_name.clone(),
                tags_added: 0,
                error: Some(error.clone()),
            },
        }
    }
}

/// Response DTO for an archive upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Archive name without its numeric prefix and extension.
    #[schema(example = "space-rockets")]
    pub base_name: String,
    pub category: CategoryResponse,
    /// Files written by the extractor.
    pub extracted_files: usize,
    pub created: usize,
    pub failed: usize,
    pub entries: Vec<EntryOutcomeResponse>,
    pub warnings: Vec<String>,
}

impl From<UploadReport> for UploadResponse {
    fn from(report: UploadReport) -> Self {
        Self {
            created: report.created(),
            failed: report.failed(),
            entries: report.entries.iter().map(Into::into).collect(),
            base_name: report.base_name,
            category: report.category.into(),
            extracted_files: report.extracted_files,
            warnings: report.warnings,
        }
    }
}

/// Multipart body accepted by the upload endpoint.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// ZIP archive named `<digits>-<base-name>.zip`. The field may also be
    /// called `file`.
    #[schema(value_type = String, format = Binary)]
    pub zip_file: Vec<u8>,
}
