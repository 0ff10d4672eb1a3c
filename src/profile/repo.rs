use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::ProfileInput;
use super::repo_types::UserProfile;

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT user_id, gender, age, height, weight, activity_factor, created_at, updated_at
          FROM user_profiles
         WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find user profile")
}

pub async fn upsert(db: &PgPool, user_id: Uuid, input: &ProfileInput) -> anyhow::Result<UserProfile> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (user_id, gender, age, height, weight, activity_factor)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE
           SET gender          = EXCLUDED.gender,
               age             = EXCLUDED.age,
               height          = EXCLUDED.height,
               weight          = EXCLUDED.weight,
               activity_factor = EXCLUDED.activity_factor,
               updated_at      = now()
        RETURNING user_id, gender, age, height, weight, activity_factor, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(input.gender.as_str())
    .bind(input.age)
    .bind(input.height)
    .bind(input.weight)
    .bind(input.activity_factor)
    .fetch_one(db)
    .await
    .context("upsert user profile")
}
