//! Daily / weekly / monthly rollups of parsed meal nutrition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

use super::parser::Nutrients;
use super::repo_types::NutritionAdjustment;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    #[serde(flatten)]
    pub totals: Nutrients,
    pub count: i64,
}

impl Bucket {
    fn add(&mut self, n: Nutrients) {
        self.totals += n;
        self.count += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub daily: BTreeMap<String, Bucket>,
    pub weekly: BTreeMap<String, Bucket>,
    pub monthly: BTreeMap<String, Bucket>,
}

pub fn date_key(d: Date) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}

pub fn day_key(ts: OffsetDateTime) -> String {
    date_key(ts.to_offset(UtcOffset::UTC).date())
}

pub fn month_key(ts: OffsetDateTime) -> String {
    let d = ts.to_offset(UtcOffset::UTC).date();
    format!("{:04}-{:02}", d.year(), u8::from(d.month()))
}

/// Approximate ISO week label, `YYYY-W<n>`.
///
/// Counts weeks from January 4th of the timestamp's calendar year, shifted by
/// that day's weekday (Sunday = 0). Not true ISO-8601: the first days of
/// January can land in week 0 or 1 and the year is never rolled over.
pub fn week_key(ts: OffsetDateTime) -> String {
    let ts = ts.to_offset(UtcOffset::UTC);
    let date = ts.date();
    let year = date.year();
    let jan4 = (date - time::Duration::days(i64::from(date.ordinal()) - 4))
        .midnight()
        .assume_utc();
    let day_diff = (ts - jan4).as_seconds_f64() / 86_400.0;
    let offset = f64::from(jan4.weekday().number_days_from_sunday());
    let week = ((day_diff + offset + 1.0) / 7.0).ceil() as i64;
    format!("{year}-W{week}")
}

pub fn aggregate<I>(records: I) -> Aggregates
where
    I: IntoIterator<Item = (OffsetDateTime, Nutrients)>,
{
    let mut out = Aggregates::default();
    for (ts, n) in records {
        out.daily.entry(day_key(ts)).or_default().add(n);
        out.weekly.entry(week_key(ts)).or_default().add(n);
        out.monthly.entry(month_key(ts)).or_default().add(n);
    }
    out
}

/// Overlays user adjustments onto the daily buckets.
///
/// Adjusted fields replace the computed sums; optional fields left unset keep
/// the computed value. An adjustment for a day without uploads creates that
/// day with a count of one.
pub fn apply_adjustments<'a, I>(daily: &mut BTreeMap<String, Bucket>, adjustments: I)
where
    I: IntoIterator<Item = &'a NutritionAdjustment>,
{
    for adj in adjustments {
        let bucket = daily.entry(date_key(adj.date)).or_insert(Bucket {
            totals: Nutrients::default(),
            count: 1,
        });
        let t = &mut bucket.totals;
        t.calories = adj.calories;
        t.protein = adj.protein;
        t.fat = adj.fat;
        t.carbs = adj.carbs;
        if let Some(v) = adj.vitamin {
            t.vitamin = v;
        }
        if let Some(v) = adj.mineral {
            t.mineral = v;
        }
        if let Some(v) = adj.fiber {
            t.fiber = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    #[default]
    Month,
    HalfYear,
    Year,
}

impl Period {
    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::HalfYear => 182,
            Period::Year => 365,
        }
    }
}

/// The six nutrients compared against recommendations (calories excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Intake<T> {
    pub protein: T,
    pub fat: T,
    pub carbs: T,
    pub vitamin: T,
    pub mineral: T,
    pub fiber: T,
}

pub const DAILY_RECOMMENDED: Intake<i64> = Intake {
    protein: 60,
    fat: 70,
    carbs: 350,
    vitamin: 50,
    mineral: 100,
    fiber: 30,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodIntake {
    pub period: Period,
    pub days: i64,
    pub since: String,
    pub totals: Intake<i64>,
    pub recommended: Intake<i64>,
    pub percentages: Intake<f64>,
}

fn percent(actual: i64, recommended: i64) -> f64 {
    if recommended == 0 {
        0.0
    } else {
        actual as f64 / recommended as f64 * 100.0
    }
}

/// Sums daily buckets dated on or after `today - period` and compares them
/// with the recommended intake for that many days.
pub fn period_intake(
    daily: &BTreeMap<String, Bucket>,
    today: Date,
    period: Period,
) -> PeriodIntake {
    let days = period.days();
    let since = date_key(today - time::Duration::days(days));

    let mut totals = Intake::<i64>::default();
    for bucket in daily.range(since.clone()..).map(|(_, b)| b.totals) {
        totals.protein = totals.protein.saturating_add(bucket.protein);
        totals.fat = totals.fat.saturating_add(bucket.fat);
        totals.carbs = totals.carbs.saturating_add(bucket.carbs);
        totals.vitamin = totals.vitamin.saturating_add(bucket.vitamin);
        totals.mineral = totals.mineral.saturating_add(bucket.mineral);
        totals.fiber = totals.fiber.saturating_add(bucket.fiber);
    }

    let r = DAILY_RECOMMENDED;
    let recommended = Intake {
        protein: r.protein * days,
        fat: r.fat * days,
        carbs: r.carbs * days,
        vitamin: r.vitamin * days,
        mineral: r.mineral * days,
        fiber: r.fiber * days,
    };
    let percentages = Intake {
        protein: percent(totals.protein, recommended.protein),
        fat: percent(totals.fat, recommended.fat),
        carbs: percent(totals.carbs, recommended.carbs),
        vitamin: percent(totals.vitamin, recommended.vitamin),
        mineral: percent(totals.mineral, recommended.mineral),
        fiber: percent(totals.fiber, recommended.fiber),
    };

    PeriodIntake {
        period,
        days,
        since,
        totals,
        recommended,
        percentages,
    }
}
