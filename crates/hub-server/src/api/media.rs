use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use hub_core::{storage_folder, ResourceType};
use hub_media::{MediaUpload, UploadedMedia};

use super::AppState;
use crate::{error::ApiError, extract::AuthUser};

const FILE_FIELD: &str = "file";

fn multipart_error(error: &MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::validation(error.body_text())
    }
}

/// Relays the `file` field of a multipart body to the media provider.
///
/// Any identified caller may upload; the file lands in the caller's folder.
pub(super) async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedMedia>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::validation(e.body_text()))?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
        file = Some((file_name, content_type, bytes));
        break;
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| ApiError::validation("file is required"))?;
    if bytes.len() > state.settings.upload_max_bytes {
        return Err(ApiError::PayloadTooLarge);
    }

    let resource_type = ResourceType::from_mime(content_type.as_deref());
    let folder = storage_folder(&state.settings.media_folder_template, user.id);
    tracing::info!(
        user_id = %user.id,
        size = bytes.len(),
        %resource_type,
        folder = %folder,
        "relaying media upload"
    );

    let uploaded = state
        .media
        .upload(MediaUpload {
            bytes,
            file_name,
            content_type,
            folder,
            resource_type,
        })
        .await
        .map_err(|error| {
            tracing::error!(error = %error, "media upload failed");
            ApiError::Upstream(error.to_string())
        })?;

    Ok(Json(uploaded))
}

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;
