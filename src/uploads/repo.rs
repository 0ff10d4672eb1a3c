use anyhow::Context;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::Upload;

pub async fn insert_upload_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    image_url: &str,
    ai_response: &str,
) -> anyhow::Result<Upload> {
    sqlx::query_as::<_, Upload>(
        r#"
        INSERT INTO uploads (user_id, image_url, ai_response)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, image_url, ai_response, created_at
        "#,
    )
    .bind(user_id)
    .bind(image_url)
    .bind(ai_response)
    .fetch_one(&mut **tx)
    .await
    .context("insert upload")
}
