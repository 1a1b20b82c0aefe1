use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
};
use common::uploader::UploadError;
use tracing::{error, info, instrument, warn};

use crate::error::AppError;
use crate::extractors::archive::ArchiveUpload;
use crate::render::{UPLOAD_FAILED_MESSAGE, render_error, render_page, render_report};
use crate::state::AppState;

/// GET /admin/icons
///
/// Upload form.
pub async fn upload_form() -> Html<String> {
    Html(render_page(None))
}

/// POST /admin/icons
///
/// Processes the submitted archive and renders the form again with the
/// result above it. Failures are shown as an error banner, never as a
/// bare error response.
#[instrument(skip(state, upload))]
pub async fn upload_submit(
    State(state): State<AppState>,
    upload: Result<ArchiveUpload, AppError>,
) -> (StatusCode, Html<String>) {
    let archive = match upload {
        Ok(ArchiveUpload(archive)) => archive,
        Err(e) => {
            warn!(error = ?e, "Rejected upload form");
            return (
                StatusCode::BAD_REQUEST,
                Html(render_page(Some(&render_error(&e.public_message())))),
            );
        }
    };

    match state.uploader.handle(archive).await {
        Ok(report) => {
            info!(
                base_name = %report.base_name,
                created = report.created(),
                failed = report.failed(),
                "Upload processed"
            );
            (StatusCode::OK, Html(render_page(Some(&render_report(&report)))))
        }
        Err(e) => {
            let (status, message) = failure_banner(&e);
            (status, Html(render_page(Some(&render_error(&message)))))
        }
    }
}

fn failure_banner(err: &UploadError) -> (StatusCode, String) {
    match err {
        UploadError::InvalidFile(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        UploadError::Storage(_) | UploadError::Category(_) => {
            error!(error = %err, "Upload failed");
            (StatusCode::INTERNAL_SERVER_ERROR, UPLOAD_FAILED_MESSAGE.into())
        }
        UploadError::Extraction(_) => {
            error!(error = %err, "Upload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The file was uploaded but could not be extracted.".into(),
            )
        }
    }
}
