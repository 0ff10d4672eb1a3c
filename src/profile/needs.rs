//! Daily energy and macro targets from body measurements.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Accepts the canonical names and the Japanese labels older clients send.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            g if g.eq_ignore_ascii_case("male") || g == "男性" => Some(Gender::Male),
            g if g.eq_ignore_ascii_case("female") || g == "女性" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaloricNeeds {
    pub calories: i64,
    /// grams
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
}

const PROTEIN_SHARE: f64 = 0.15;
const FAT_SHARE: f64 = 0.25;
const CARBS_SHARE: f64 = 0.60;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_CARBS: f64 = 4.0;

/// Revised Harris-Benedict basal rate, rounded to whole kcal.
pub fn basal_metabolic_rate(gender: Gender, age: i32, height_cm: f64, weight_kg: f64) -> f64 {
    let age = f64::from(age);
    let bmr = match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    };
    bmr.round()
}

pub fn caloric_needs(
    gender: Gender,
    age: i32,
    height_cm: f64,
    weight_kg: f64,
    activity_factor: f64,
) -> CaloricNeeds {
    let kcal = basal_metabolic_rate(gender, age, height_cm, weight_kg) * activity_factor;
    CaloricNeeds {
        calories: kcal.round() as i64,
        protein: (kcal * PROTEIN_SHARE / KCAL_PER_G_PROTEIN).round() as i64,
        fat: (kcal * FAT_SHARE / KCAL_PER_G_FAT).round() as i64,
        carbs: (kcal * CARBS_SHARE / KCAL_PER_G_CARBS).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_reference_values() {
        assert_eq!(basal_metabolic_rate(Gender::Male, 30, 175.0, 70.0), 1696.0);
        assert_eq!(
            caloric_needs(Gender::Male, 30, 175.0, 70.0, 1.55),
            CaloricNeeds {
                calories: 2629,
                protein: 99,
                fat: 73,
                carbs: 394,
            }
        );
    }

    #[test]
    fn female_reference_values() {
        assert_eq!(basal_metabolic_rate(Gender::Female, 25, 160.0, 55.0), 1344.0);
        assert_eq!(
            caloric_needs(Gender::Female, 25, 160.0, 55.0, 1.2),
            CaloricNeeds {
                calories: 1613,
                protein: 60,
                fat: 45,
                carbs: 242,
            }
        );
    }

    #[test]
    fn deterministic_for_same_profile() {
        let a = caloric_needs(Gender::Female, 41, 158.5, 61.2, 1.375);
        let b = caloric_needs(Gender::Female, 41, 158.5, 61.2, 1.375);
        assert_eq!(a, b);
    }

    #[test]
    fn activity_factor_scales_linearly() {
        let sedentary = caloric_needs(Gender::Male, 40, 180.0, 80.0, 1.2);
        let athlete = caloric_needs(Gender::Male, 40, 180.0, 80.0, 1.9);
        assert!(athlete.calories > sedentary.calories);
        assert_eq!(
            athlete.calories,
            (basal_metabolic_rate(Gender::Male, 40, 180.0, 80.0) * 1.9).round() as i64
        );
    }

    #[test]
    fn gender_parse_accepts_aliases() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse("男性"), Some(Gender::Male));
        assert_eq!(Gender::parse("女性"), Some(Gender::Female));
        assert_eq!(Gender::parse(""), None);
        assert_eq!(Gender::parse("other"), None);
    }
}
