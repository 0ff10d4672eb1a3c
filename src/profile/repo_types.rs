use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::needs::{caloric_needs, CaloricNeeds, Gender};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub gender: String,
    pub age: i32,
    /// cm
    pub height: f64,
    /// kg
    pub weight: f64,
    pub activity_factor: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserProfile {
    /// `None` when the stored gender is not one the formula knows.
    pub fn needs(&self) -> Option<CaloricNeeds> {
        let gender = Gender::parse(&self.gender)?;
        Some(caloric_needs(
            gender,
            self.age,
            self.height,
            self.weight,
            self.activity_factor,
        ))
    }
}
