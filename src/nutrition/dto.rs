use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use super::aggregate::Period;
use super::repo_types::NutritionAdjustment;
use crate::error::ApiError;

/// Upper bound for any single adjusted nutrient value.
pub const MAX_NUTRIENT_VALUE: i64 = 1_000_000;

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    #[serde(default)]
    pub date: Option<String>,
    pub calories: i64,
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
    #[serde(default)]
    pub vitamin: Option<i64>,
    #[serde(default)]
    pub mineral: Option<i64>,
    #[serde(default)]
    pub fiber: Option<i64>,
}

/// A validated adjustment ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentInput {
    pub date: Date,
    pub calories: i64,
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
    pub vitamin: Option<i64>,
    pub mineral: Option<i64>,
    pub fiber: Option<i64>,
}

impl TryFrom<AdjustRequest> for AdjustmentInput {
    type Error = ApiError;

    fn try_from(req: AdjustRequest) -> Result<Self, Self::Error> {
        let raw = req
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Date is required".into()))?;
        let date = Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .map_err(|_| ApiError::BadRequest("Date must be YYYY-MM-DD".into()))?;

        let values: Vec<i64> = [req.calories, req.protein, req.fat, req.carbs]
            .into_iter()
            .chain([req.vitamin, req.mineral, req.fiber].into_iter().flatten())
            .collect();
        if values.iter().any(|v| *v < 0) {
            return Err(ApiError::BadRequest("Nutrient values must not be negative".into()));
        }
        if values.iter().any(|v| *v > MAX_NUTRIENT_VALUE) {
            return Err(ApiError::BadRequest(format!(
                "Nutrient values must not exceed {MAX_NUTRIENT_VALUE}"
            )));
        }

        Ok(Self {
            date,
            calories: req.calories,
            protein: req.protein,
            fat: req.fat,
            carbs: req.carbs,
            vitamin: req.vitamin,
            mineral: req.mineral,
            fiber: req.fiber,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AdjustResponse {
    pub adjustment: NutritionAdjustment,
}

#[derive(Debug, Default, Deserialize)]
pub struct IntakeQuery {
    #[serde(default)]
    pub period: Period,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn req(date: Option<&str>) -> AdjustRequest {
        AdjustRequest {
            date: date.map(Into::into),
            calories: 1800,
            protein: 70,
            fat: 60,
            carbs: 220,
            vitamin: None,
            mineral: None,
            fiber: Some(20),
        }
    }

    #[test]
    fn accepts_iso_date() {
        let input = AdjustmentInput::try_from(req(Some("2024-03-01"))).unwrap();
        assert_eq!(input.date, date!(2024 - 03 - 01));
        assert_eq!(input.fiber, Some(20));
    }

    #[test]
    fn missing_date_is_rejected() {
        let err = AdjustmentInput::try_from(req(None)).unwrap_err();
        assert_eq!(err.to_string(), "Date is required");
        assert!(AdjustmentInput::try_from(req(Some("  "))).is_err());
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(AdjustmentInput::try_from(req(Some("2024-02-30"))).is_err());
        assert!(AdjustmentInput::try_from(req(Some("03/01/2024"))).is_err());
    }

    #[test]
    fn negative_values_are_rejected() {
        let mut r = req(Some("2024-03-01"));
        r.mineral = Some(-1);
        assert!(AdjustmentInput::try_from(r).is_err());
    }

    #[test]
    fn oversized_values_are_rejected() {
        let mut r = req(Some("2024-03-01"));
        r.protein = i64::MAX;
        let err = AdjustmentInput::try_from(r).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let mut r = req(Some("2024-03-01"));
        r.fiber = Some(MAX_NUTRIENT_VALUE + 1);
        assert!(AdjustmentInput::try_from(r).is_err());

        let mut r = req(Some("2024-03-01"));
        r.calories = MAX_NUTRIENT_VALUE;
        assert!(AdjustmentInput::try_from(r).is_ok());
    }
}
