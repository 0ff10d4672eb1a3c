use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::UploadResponse;
use super::services::{analyze_and_record, is_image, UploadedImage};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /upload (multipart): `image` file plus `threadId` text field.
#[instrument(skip(state, mp))]
pub async fn upload_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut mp = mp?;
    let mut image: Option<UploadedImage> = None;
    let mut thread_id: Option<String> = None;

    while let Some(field) = mp.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let body = field.bytes().await?;
                image = Some(UploadedImage {
                    file_name,
                    content_type,
                    body,
                });
            }
            "threadId" => {
                thread_id = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let image = image
        .filter(|i| !i.body.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".into()))?;
    let thread_id = thread_id
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Thread ID is required".into()))?;
    if !is_image(&image.content_type) {
        warn!(%user_id, content_type = %image.content_type, "rejected non-image upload");
        return Err(ApiError::BadRequest("Uploaded file must be an image".into()));
    }

    let outcome = analyze_and_record(&state, user_id, &thread_id, image)
        .await
        .map_err(ApiError::internal("Image analysis and upload failed"))?;

    Ok(Json(UploadResponse {
        id: outcome.upload_id,
        result: outcome.analysis,
        url: outcome.url,
    }))
}
