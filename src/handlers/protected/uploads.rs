// handlers/protected/uploads.rs - Banner and regulation uploads
//
// Multipart body with a single `file` field. Type and size are checked
// before the bytes are written; the request as a whole is capped by the
// router's body limit, which surfaces here as a 413.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{StoredUpload, UploadError, UploadKind, UploadService};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /api/uploads/banner
pub async fn banner_post(State(state): State<AppState>, multipart: Multipart) -> ApiResult<StoredUpload> {
    upload(&state, UploadKind::Banner, multipart).await
}

/// POST /api/uploads/regulation
pub async fn regulation_post(State(state): State<AppState>, multipart: Multipart) -> ApiResult<StoredUpload> {
    upload(&state, UploadKind::Regulation, multipart).await
}

async fn upload(state: &AppState, kind: UploadKind, mut multipart: Multipart) -> ApiResult<StoredUpload> {
    let config = &state.config.uploads;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        // Reject the type before buffering the body
        UploadService::check(kind, &content_type, 1, config).map_err(upload_error)?;

        let bytes = field.bytes().await.map_err(multipart_error)?;
        let extension = UploadService::check(kind, &content_type, bytes.len(), config).map_err(upload_error)?;

        let stored = UploadService::new(config)
            .store(kind, extension, &content_type, &bytes)
            .await
            .map_err(upload_error)?;

        return Ok(ApiResponse::created(stored));
    }

    Err(ApiError::invalid_field(FILE_FIELD, "A file is required"))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(err.body_text())
    } else {
        ApiError::bad_request(err.body_text())
    }
}

fn upload_error(err: UploadError) -> ApiError {
    match err {
        UploadError::Io(e) => {
            tracing::error!("Upload could not be written: {}", e);
            ApiError::internal_server_error("Failed to store file")
        }
        other => ApiError::invalid_field(FILE_FIELD, other.to_string()),
    }
}
