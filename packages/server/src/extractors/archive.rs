use axum::extract::{FromRequest, Multipart, Request};
use common::filename::client_file_name;
use common::uploader::UploadedArchive;

use crate::error::AppError;

/// Multipart field names that may carry the archive.
pub const ARCHIVE_FIELDS: [&str; 2] = ["zip_file", "file"];

/// The uploaded ZIP archive, read from the first `zip_file` (or `file`)
/// multipart field. Other fields are ignored.
pub struct ArchiveUpload(pub UploadedArchive);

impl<S> FromRequest<S> for ArchiveUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            let is_archive = field.name().is_some_and(|n| ARCHIVE_FIELDS.contains(&n));
            if !is_archive {
                continue;
            }

            let file_name = field
                .file_name()
                .map(client_file_name)
                .unwrap_or_default()
                .to_string();
            if file_name.is_empty() {
                return Err(AppError::Validation("No file selected.".into()));
            }

            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

            return Ok(ArchiveUpload(UploadedArchive {
                file_name,
                bytes: bytes.to_vec(),
            }));
        }

        Err(AppError::Validation(
            "Missing `zip_file` field in multipart form".into(),
        ))
    }
}
