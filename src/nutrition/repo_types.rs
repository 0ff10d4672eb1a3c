use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// User-entered override of one day's totals.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NutritionAdjustment {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub calories: i64,
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
    pub vitamin: Option<i64>,
    pub mineral: Option<i64>,
    pub fiber: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The slice of an upload the dashboard needs.
#[derive(Debug, Clone, FromRow)]
pub struct UploadNutritionRow {
    pub created_at: OffsetDateTime,
    pub ai_response: String,
}
