use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::archive::ArchiveUpload;
use crate::models::upload::{UploadForm, UploadResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Uploads",
    operation_id = "uploadArchive",
    summary = "Upload an icon archive",
    description = "Accepts a ZIP named `<digits>-<base-name>.zip` in the `zip_file` (or `file`) \
        multipart field. The category derived from the base name is created if missing, the \
        archive is extracted under the upload root and one published entry is created per PNG \
        in its `png/` folder. Per-image failures are reported in `entries` and do not fail \
        the request.",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Archive processed", body = UploadResponse),
        (status = 400, description = "Missing field or invalid file type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage or extraction failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, upload), fields(file_name = %upload.0.file_name))]
pub async fn upload_archive(
    State(state): State<AppState>,
    upload: ArchiveUpload,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let report = state.uploader.handle(upload.0).await?;

    tracing::info!(
        base_name = %report.base_name,
        created = report.created(),
        failed = report.failed(),
        "Upload processed"
    );

    Ok((StatusCode::CREATED, Json(report.into())))
}
