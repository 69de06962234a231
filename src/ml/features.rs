//! Calendar-based feature engineering over the attendance snapshot.

use crate::export::SummaryRow;
use crate::models::MealType;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The model inputs, in the order they appear in the coefficient vector.
pub const FEATURE_NAMES: [&str; 5] = [
    "day_of_week_num",
    "is_weekend",
    "month",
    "day_of_month",
    "meal_type_encoded",
];

/// One feature-engineered row: the original summary columns plus the derived
/// calendar columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub students_present: i64,
    pub actual_attended: i64,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week_num: i64,
    pub is_weekend: i64,
    pub month: i64,
    pub day_of_month: i64,
    pub is_month_start: i64,
    pub is_month_end: i64,
    pub meal_type_encoded: i64,
}

impl FeatureRow {
    /// The regression inputs, ordered as in [`FEATURE_NAMES`].
    pub fn features(&self) -> [f64; 5] {
        [
            self.day_of_week_num as f64,
            self.is_weekend as f64,
            self.month as f64,
            self.day_of_month as f64,
            self.meal_type_encoded as f64,
        ]
    }

    /// The regression target.
    pub fn target(&self) -> f64 {
        self.actual_attended as f64
    }
}

/// Derives the five model features for an arbitrary (date, meal) pair. Used
/// both while building the training set and at prediction time.
pub fn calendar_features(date: NaiveDate, meal: MealType) -> [f64; 5] {
    let day_of_week_num = date.weekday().num_days_from_monday() as f64;
    [
        day_of_week_num,
        (day_of_week_num >= 5.0) as i64 as f64,
        date.month() as f64,
        date.day() as f64,
        meal.encoded() as f64,
    ]
}

/// Expands summary rows into feature rows.
pub fn engineer(rows: &[SummaryRow]) -> Vec<FeatureRow> {
    rows.iter()
        .map(|row| {
            let day_of_week_num = row.date.weekday().num_days_from_monday() as i64;
            let day_of_month = row.date.day() as i64;

            FeatureRow {
                date: row.date,
                meal_type: row.meal_type,
                students_present: row.students_present,
                actual_attended: row.actual_attended,
                day_of_week_num,
                is_weekend: (day_of_week_num >= 5) as i64,
                month: row.date.month() as i64,
                day_of_month,
                is_month_start: (day_of_month <= 5) as i64,
                is_month_end: (day_of_month >= 25) as i64,
                meal_type_encoded: row.meal_type.encoded(),
            }
        })
        .collect()
}

/// Writes feature rows as CSV, creating the parent directory if needed.
pub fn write_features(rows: &[FeatureRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reads a previously written feature CSV.
pub fn load_features(path: &Path) -> Result<Vec<FeatureRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: FeatureRow = record.context("malformed feature row")?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(date: NaiveDate, meal: MealType, attended: i64) -> SummaryRow {
        SummaryRow {
            date,
            meal_type: meal,
            students_present: attended,
            actual_attended: attended,
            day_of_week: date.format("%A").to_string(),
            is_weekend: 0,
        }
    }

    #[test]
    fn features_for_a_known_sunday() {
        // 2026-01-25 is a Sunday.
        let date = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
        let features = calendar_features(date, MealType::Lunch);

        assert_eq!(features, [6.0, 1.0, 1.0, 25.0, 1.0]);
    }

    #[test]
    fn features_for_a_known_weekday() {
        // 2024-12-25 is a Wednesday.
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let features = calendar_features(date, MealType::Dinner);

        assert_eq!(features, [2.0, 0.0, 12.0, 25.0, 2.0]);
    }

    #[test]
    fn engineered_columns_stay_in_range() {
        let rows: Vec<SummaryRow> = (0u64..400)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i / 3);
                summary(date, MealType::ALL[(i % 3) as usize], 30 + (i % 7) as i64)
            })
            .collect();

        for feature in engineer(&rows) {
            assert!((0..=6).contains(&feature.day_of_week_num));
            assert!(feature.is_weekend == 0 || feature.is_weekend == 1);
            assert!((1..=12).contains(&feature.month));
            assert!((1..=31).contains(&feature.day_of_month));
            assert!(feature.is_month_start == 0 || feature.is_month_start == 1);
            assert!(feature.is_month_end == 0 || feature.is_month_end == 1);
            assert!((0..=2).contains(&feature.meal_type_encoded));

            // Weekend flag agrees with the weekday index.
            assert_eq!(feature.is_weekend, (feature.day_of_week_num >= 5) as i64);
        }
    }

    #[test]
    fn month_start_and_end_flags() {
        let start = summary(
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            MealType::Lunch,
            30,
        );
        let end = summary(
            NaiveDate::from_ymd_opt(2024, 3, 28).unwrap(),
            MealType::Lunch,
            30,
        );
        let middle = summary(
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            MealType::Lunch,
            30,
        );

        let engineered = engineer(&[start, end, middle]);
        assert_eq!(engineered[0].is_month_start, 1);
        assert_eq!(engineered[0].is_month_end, 0);
        assert_eq!(engineered[1].is_month_start, 0);
        assert_eq!(engineered[1].is_month_end, 1);
        assert_eq!(engineered[2].is_month_start, 0);
        assert_eq!(engineered[2].is_month_end, 0);
    }

    #[test]
    fn feature_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attendance_features.csv");

        let rows = engineer(&[summary(
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            MealType::Breakfast,
            35,
        )]);

        write_features(&rows, &path).unwrap();
        assert_eq!(load_features(&path).unwrap(), rows);
    }
}
