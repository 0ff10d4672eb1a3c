use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::AdjustmentInput;
use super::repo_types::{NutritionAdjustment, UploadNutritionRow};

pub async fn list_upload_responses(
    db: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Vec<UploadNutritionRow>> {
    sqlx::query_as::<_, UploadNutritionRow>(
        r#"
        SELECT created_at, ai_response
          FROM uploads
         WHERE user_id = $1
         ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list uploads for nutrition")
}

pub async fn list_adjustments(
    db: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Vec<NutritionAdjustment>> {
    sqlx::query_as::<_, NutritionAdjustment>(
        r#"
        SELECT id, user_id, date, calories, protein, fat, carbs,
               vitamin, mineral, fiber, updated_at
          FROM nutrition_adjustments
         WHERE user_id = $1
         ORDER BY date ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list nutrition adjustments")
}

/// One row per (user, date): a second adjustment for the same day replaces the first.
pub async fn upsert_adjustment(
    db: &PgPool,
    user_id: Uuid,
    input: &AdjustmentInput,
) -> anyhow::Result<NutritionAdjustment> {
    sqlx::query_as::<_, NutritionAdjustment>(
        r#"
        INSERT INTO nutrition_adjustments
               (user_id, date, calories, protein, fat, carbs, vitamin, mineral, fiber)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (user_id, date) DO UPDATE
           SET calories   = EXCLUDED.calories,
               protein    = EXCLUDED.protein,
               fat        = EXCLUDED.fat,
               carbs      = EXCLUDED.carbs,
               vitamin    = EXCLUDED.vitamin,
               mineral    = EXCLUDED.mineral,
               fiber      = EXCLUDED.fiber,
               updated_at = now()
        RETURNING id, user_id, date, calories, protein, fat, carbs,
                  vitamin, mineral, fiber, updated_at
        "#,
    )
    .bind(user_id)
    .bind(input.date)
    .bind(input.calories)
    .bind(input.protein)
    .bind(input.fat)
    .bind(input.carbs)
    .bind(input.vitamin)
    .bind(input.mineral)
    .bind(input.fiber)
    .fetch_one(db)
    .await
    .context("upsert nutrition adjustment")
}
