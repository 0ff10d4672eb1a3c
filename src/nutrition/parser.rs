use std::ops::AddAssign;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Per-meal nutrient figures as reported by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrients {
    pub calories: i64,
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
    pub vitamin: i64,
    pub mineral: i64,
    pub fiber: i64,
}

/// Sums saturate at `i64::MAX` instead of overflowing.
impl AddAssign for Nutrients {
    fn add_assign(&mut self, rhs: Self) {
        self.calories = self.calories.saturating_add(rhs.calories);
        self.protein = self.protein.saturating_add(rhs.protein);
        self.fat = self.fat.saturating_add(rhs.fat);
        self.carbs = self.carbs.saturating_add(rhs.carbs);
        self.vitamin = self.vitamin.saturating_add(rhs.vitamin);
        self.mineral = self.mineral.saturating_add(rhs.mineral);
        self.fiber = self.fiber.saturating_add(rhs.fiber);
    }
}

lazy_static! {
    static ref CALORIES_RE: Regex = Regex::new(r"(?:カロリー|(?i:calories?))[:：]\s*(\d+)").unwrap();
    static ref PROTEIN_RE: Regex = Regex::new(r"(?:タンパク質|(?i:protein))[:：]\s*(\d+)").unwrap();
    static ref FAT_RE: Regex = Regex::new(r"(?:脂質|(?i:\bfat))[:：]\s*(\d+)").unwrap();
    static ref CARBS_RE: Regex =
        Regex::new(r"(?:炭水化物|(?i:carbohydrates?|carbs))[:：]\s*(\d+)").unwrap();
    static ref VITAMIN_RE: Regex = Regex::new(r"(?:ビタミン|(?i:vitamins?))[:：]\s*(\d+)").unwrap();
    static ref MINERAL_RE: Regex = Regex::new(r"(?:ミネラル|(?i:minerals?))[:：]\s*(\d+)").unwrap();
    static ref FIBER_RE: Regex = Regex::new(r"(?:食物繊維|(?i:fiber))[:：]\s*(\d+)").unwrap();
}

fn field(re: &Regex, text: &str) -> i64 {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Pulls the labelled figures out of free-form model output.
///
/// Missing labels read as zero. Only the first occurrence of each label is used.
pub fn parse_nutrients(text: &str) -> Nutrients {
    Nutrients {
        calories: field(&CALORIES_RE, text),
        protein: field(&PROTEIN_RE, text),
        fat: field(&FAT_RE, text),
        carbs: field(&CARBS_RE, text),
        vitamin: field(&VITAMIN_RE, text),
        mineral: field(&MINERAL_RE, text),
        fiber: field(&FIBER_RE, text),
    }
}
