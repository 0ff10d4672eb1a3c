use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{ChatMessage, ChatRole};

/// Append a message within a transaction. Messages are never updated or removed.
pub async fn insert_message_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    thread_id: &str,
    role: ChatRole,
    message: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_history (user_id, thread_id, role, message)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(thread_id)
    .bind(role.as_str())
    .bind(message)
    .execute(&mut **tx)
    .await
    .with_context(|| format!("insert {} chat message", role.as_str()))?;
    Ok(())
}

/// Store a user message and the bot's reply together.
pub async fn append_exchange(
    db: &PgPool,
    user_id: Uuid,
    thread_id: &str,
    user_message: &str,
    bot_message: &str,
) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin tx")?;
    insert_message_tx(&mut tx, user_id, thread_id, ChatRole::User, user_message).await?;
    insert_message_tx(&mut tx, user_id, thread_id, ChatRole::Bot, bot_message).await?;
    tx.commit().await.context("commit tx")?;
    Ok(())
}

pub async fn list_thread(
    db: &PgPool,
    user_id: Uuid,
    thread_id: &str,
) -> anyhow::Result<Vec<ChatMessage>> {
    sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, user_id, thread_id, role, message, created_at
          FROM chat_history
         WHERE user_id = $1 AND thread_id = $2
         ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .bind(thread_id)
    .fetch_all(db)
    .await
    .context("list chat thread")
}

pub async fn list_all(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ChatMessage>> {
    sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, user_id, thread_id, role, message, created_at
          FROM chat_history
         WHERE user_id = $1
         ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list chat history")
}
