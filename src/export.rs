//! The CSV snapshot that feeds the analytics and forecasting pipeline.
//!
//! Attendance rows are collapsed to one row per `(date, meal_type)` with the
//! number of records and the number of students actually present, then written
//! to `attendance_summary.csv` under the configured data directory.

use crate::manager::AttendanceManager;
use crate::models::MealType;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One aggregated row of the attendance snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub meal_type: MealType,
    /// Number of attendance records for this date and meal.
    pub students_present: i64,
    /// Number of those records marked present.
    pub actual_attended: i64,
    pub day_of_week: String,
    pub is_weekend: i64,
}

/// Collapses all attendance records into per-(date, meal) summary rows,
/// ordered by date and then meal.
pub fn summarize(manager: &mut AttendanceManager) -> Result<Vec<SummaryRow>> {
    let records = manager
        .all_attendance()
        .context("failed to load attendance records")?;

    let mut grouped: BTreeMap<(NaiveDate, i64), (MealType, i64, i64)> = BTreeMap::new();
    for record in records {
        let key = (record.date, record.meal_type.encoded());
        let entry = grouped.entry(key).or_insert((record.meal_type, 0, 0));
        entry.1 += 1;
        if record.is_present {
            entry.2 += 1;
        }
    }

    let rows = grouped
        .into_iter()
        .map(|((date, _), (meal_type, total, present))| SummaryRow {
            date,
            meal_type,
            students_present: total,
            actual_attended: present,
            day_of_week: date.format("%A").to_string(),
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun) as i64,
        })
        .collect();

    Ok(rows)
}

/// Writes summary rows as CSV, creating the parent directory if needed.
pub fn write_summary(rows: &[SummaryRow], path: &Path) -> Result<()> {
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

/// Reads a previously written summary CSV.
pub fn load_summary(path: &Path) -> Result<Vec<SummaryRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: SummaryRow = record.context("malformed summary row")?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAttendance, NewStudent};

    #[test]
    fn summarize_groups_by_date_and_meal() {
        let mut manager = AttendanceManager::open_in_memory();
        let join = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        manager
            .insert_students(&[
                NewStudent { name: "Arif Hossain", room_no: "101A", department: "CSE", join_date: join },
                NewStudent { name: "Mitu Rahman", room_no: "202B", department: "EEE", join_date: join },
            ])
            .unwrap();

        let wednesday = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();

        for (student_id, date, meal_type, is_present) in [
            (1, wednesday, MealType::Lunch, true),
            (2, wednesday, MealType::Lunch, false),
            (1, saturday, MealType::Breakfast, true),
        ] {
            manager
                .insert_attendance(&NewAttendance { student_id, date, meal_type, is_present })
                .unwrap();
        }

        let rows = summarize(&mut manager).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].date, wednesday);
        assert_eq!(rows[0].meal_type, MealType::Lunch);
        assert_eq!(rows[0].students_present, 2);
        assert_eq!(rows[0].actual_attended, 1);
        assert_eq!(rows[0].day_of_week, "Wednesday");
        assert_eq!(rows[0].is_weekend, 0);

        assert_eq!(rows[1].date, saturday);
        assert_eq!(rows[1].is_weekend, 1);
    }

    #[test]
    fn summary_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("attendance_summary.csv");

        let rows = vec![SummaryRow {
            date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            meal_type: MealType::Dinner,
            students_present: 40,
            actual_attended: 36,
            day_of_week: "Wednesday".to_string(),
            is_weekend: 0,
        }];

        write_summary(&rows, &path).unwrap();
        let loaded = load_summary(&path).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn load_summary_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_summary(&dir.path().join("missing.csv")).is_err());
    }
}
