use serde::Deserialize;
use serde_json::Value;

use super::needs::Gender;
use crate::error::ApiError;

/// Body of `PUT /user/profile`.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub gender: String,
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    /// Kept loose so a non-numeric value gets its own error message.
    #[serde(default)]
    pub activity_factor: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileInput {
    pub gender: Gender,
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    pub activity_factor: f64,
}

impl TryFrom<ProfileRequest> for ProfileInput {
    type Error = ApiError;

    fn try_from(req: ProfileRequest) -> Result<Self, Self::Error> {
        let activity_factor = req
            .activity_factor
            .as_f64()
            .filter(|f| f.is_finite() && *f > 0.0)
            .ok_or_else(|| ApiError::BadRequest("Invalid activity factor".into()))?;
        let gender = Gender::parse(&req.gender)
            .ok_or_else(|| ApiError::BadRequest("Invalid gender".into()))?;
        if req.age < 0 {
            return Err(ApiError::BadRequest("Invalid age".into()));
        }
        if !(req.height.is_finite() && req.height >= 0.0) {
            return Err(ApiError::BadRequest("Invalid height".into()));
        }
        if !(req.weight.is_finite() && req.weight >= 0.0) {
            return Err(ApiError::BadRequest("Invalid weight".into()));
        }
        Ok(Self {
            gender,
            age: req.age,
            height: req.height,
            weight: req.weight,
            activity_factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> Result<ProfileInput, ApiError> {
        let req: ProfileRequest = serde_json::from_value(v).unwrap();
        ProfileInput::try_from(req)
    }

    #[test]
    fn valid_profile_is_normalized() {
        let input = parse(json!({
            "gender": "男性", "age": 30, "height": 175, "weight": 70.5, "activity_factor": 1.55
        }))
        .unwrap();
        assert_eq!(input.gender, Gender::Male);
        assert_eq!(input.height, 175.0);
        assert_eq!(input.activity_factor, 1.55);
    }

    #[test]
    fn non_numeric_activity_factor_is_rejected() {
        for af in [json!("1.2"), json!(null), json!(0), json!(-1.2)] {
            let err = parse(json!({
                "gender": "female", "age": 30, "height": 160, "weight": 50, "activity_factor": af
            }))
            .unwrap_err();
            assert_eq!(err.to_string(), "Invalid activity factor");
        }
    }

    #[test]
    fn missing_activity_factor_is_rejected() {
        let err = parse(json!({ "gender": "female", "age": 30, "height": 160, "weight": 50 }))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid activity factor");
    }

    #[test]
    fn negative_measurements_are_rejected() {
        assert!(parse(json!({
            "gender": "male", "age": -1, "height": 170, "weight": 60, "activity_factor": 1.2
        }))
        .is_err());
        assert!(parse(json!({
            "gender": "male", "age": 20, "height": 170, "weight": -60, "activity_factor": 1.2
        }))
        .is_err());
    }
}
