use anyhow::Context;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::repo;
use crate::chat::{repo::insert_message_tx, repo_types::ChatRole};
use crate::llm::analyze_meal_image;
use crate::state::AppState;

pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

pub struct UploadOutcome {
    pub upload_id: Uuid,
    pub url: String,
    pub analysis: String,
}

/// Store the photo, have the model analyze it, then record the upload and
/// both sides of the exchange in the user's thread.
pub async fn analyze_and_record(
    st: &AppState,
    user_id: Uuid,
    thread_id: &str,
    image: UploadedImage,
) -> anyhow::Result<UploadOutcome> {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let key = object_key(user_id, millis, &image.file_name, &image.content_type);

    st.storage
        .put_object(&key, image.body, &image.content_type)
        .await?;
    let url = st.storage.public_url(&key);

    let analysis = analyze_meal_image(st.llm.as_ref(), &url)
        .await
        .context("analyze meal image")?;

    let mut tx = st.db.begin().await.context("begin tx")?;
    let upload = repo::insert_upload_tx(&mut tx, user_id, &url, &analysis).await?;
    insert_message_tx(&mut tx, user_id, thread_id, ChatRole::User, &url).await?;
    insert_message_tx(&mut tx, user_id, thread_id, ChatRole::Bot, &analysis).await?;
    tx.commit().await.context("commit tx")?;

    info!(%user_id, upload_id = %upload.id, %key, "meal photo analyzed");
    Ok(UploadOutcome {
        upload_id: upload.id,
        url,
        analysis,
    })
}

/// `<user>/<millis>-<sanitized file name>`
pub fn object_key(user_id: Uuid, millis: i128, file_name: &str, content_type: &str) -> String {
    let mut name = sanitize_file_name(file_name);
    if name.is_empty() {
        name = format!("image.{}", ext_from_mime(content_type).unwrap_or("bin"));
    }
    format!("{user_id}/{millis}-{name}")
}

pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn is_image(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
