use axum::{Json, extract::State};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{PresignedUploadRequest, PresignedUploadResponse},
};

/// MIME types accepted for image fields (section images, logos, thumbnails).
const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// MIME types accepted for document fields (resumes, attachments).
const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Extension derived from the client's filename; constrained to short
/// alphanumeric suffixes so the generated key never carries surprises.
fn safe_extension(filename: &str) -> String {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        ext
    } else {
        "bin".to_string()
    }
}

/// get_presigned_upload
///
/// [Authenticated Route] Issues a short-lived presigned PUT URL for a
/// direct-to-bucket upload. The MIME type picks the key prefix (images vs
/// documents) and anything outside the whitelist is rejected; the object key
/// is a fresh UUID so uploads never collide or overwrite.
#[utoipa::path(
    post,
    path = "/uploads/presigned",
    request_body = PresignedUploadRequest,
    responses(
        (status = 200, description = "Presigned URL", body = PresignedUploadResponse),
        (status = 400, description = "Unsupported file type")
    )
)]
pub async fn get_presigned_upload(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PresignedUploadRequest>,
) -> Result<Json<PresignedUploadResponse>, ApiError> {
    let prefix = if IMAGE_TYPES.contains(&payload.file_type.as_str()) {
        "uploads/images/"
    } else if DOCUMENT_TYPES.contains(&payload.file_type.as_str()) {
        "uploads/files/"
    } else {
        return Err(ApiError::BadRequest(format!(
            "Unsupported file type: {}",
            payload.file_type
        )));
    };

    let key = format!("{prefix}{}.{}", Uuid::new_v4(), safe_extension(&payload.filename));

    let upload_url = state
        .storage
        .get_presigned_upload_url(&key, &payload.file_type)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(PresignedUploadResponse {
        upload_url,
        public_url: state.storage.object_url(&key),
        resource_key: key,
    }))
}
