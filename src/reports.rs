//! Reporting queries over the roster and attendance tables.
//!
//! Rows are loaded through diesel joins and aggregated here rather than in
//! SQL, which keeps the report shapes as plain structs that render directly
//! with [`tabled`].

use crate::manager::AttendanceManager;
use crate::models::MealType;
use chrono::{Datelike, NaiveDate, Weekday};
use diesel::result::QueryResult;
use std::collections::{BTreeMap, HashMap, HashSet};
use tabled::Tabled;

/// Per-student attendance totals, ordered by total records descending.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct StudentSummaryRow {
    pub student_id: i32,
    pub name: String,
    pub department: String,
    pub total_meals: i64,
    pub meals_present: i64,
    pub meals_absent: i64,
}

pub fn student_summary(manager: &mut AttendanceManager) -> QueryResult<Vec<StudentSummaryRow>> {
    let joined = manager.all_attendance_with_students()?;

    let mut by_student: BTreeMap<i32, StudentSummaryRow> = BTreeMap::new();
    for (record, student) in joined {
        let entry = by_student
            .entry(student.student_id)
            .or_insert_with(|| StudentSummaryRow {
                student_id: student.student_id,
                name: student.name.clone(),
                department: student.department.clone(),
                total_meals: 0,
                meals_present: 0,
                meals_absent: 0,
            });

        entry.total_meals += 1;
        if record.is_present {
            entry.meals_present += 1;
        } else {
            entry.meals_absent += 1;
        }
    }

    let mut rows: Vec<StudentSummaryRow> = by_student.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_meals
            .cmp(&a.total_meals)
            .then(a.student_id.cmp(&b.student_id))
    });

    Ok(rows)
}

/// Per-meal turnout statistics.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct MealStatsRow {
    pub meal_type: MealType,
    pub unique_students: i64,
    pub total_records: i64,
    pub total_present: i64,
    pub attendance_pct: f64,
}

pub fn meal_statistics(manager: &mut AttendanceManager) -> QueryResult<Vec<MealStatsRow>> {
    let records = manager.all_attendance()?;

    let mut rows = Vec::with_capacity(MealType::ALL.len());
    for meal in MealType::ALL {
        let mut students: HashSet<i32> = HashSet::new();
        let mut total = 0i64;
        let mut present = 0i64;

        for record in records.iter().filter(|r| r.meal_type == meal) {
            students.insert(record.student_id);
            total += 1;
            if record.is_present {
                present += 1;
            }
        }

        if total == 0 {
            continue;
        }

        rows.push(MealStatsRow {
            meal_type: meal,
            unique_students: students.len() as i64,
            total_records: total,
            total_present: present,
            attendance_pct: round2(present as f64 / total as f64 * 100.0),
        });
    }

    rows.sort_by(|a, b| b.total_present.cmp(&a.total_present));
    Ok(rows)
}

/// A student whose present-count exceeds the roster-wide mean present-count.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct AboveAverageRow {
    pub student_id: i32,
    pub name: String,
    pub department: String,
    pub meals_present: i64,
}

pub fn above_average_students(manager: &mut AttendanceManager) -> QueryResult<Vec<AboveAverageRow>> {
    let joined = manager.all_attendance_with_students()?;

    // Present-counts per student, counting only students with at least one
    // present record.
    let mut present_counts: BTreeMap<i32, (String, String, i64)> = BTreeMap::new();
    for (record, student) in joined {
        if record.is_present {
            let entry = present_counts
                .entry(student.student_id)
                .or_insert((student.name.clone(), student.department.clone(), 0));
            entry.2 += 1;
        }
    }

    if present_counts.is_empty() {
        return Ok(Vec::new());
    }

    let total: i64 = present_counts.values().map(|(_, _, count)| count).sum();
    let mean = total as f64 / present_counts.len() as f64;

    let mut rows: Vec<AboveAverageRow> = present_counts
        .into_iter()
        .filter(|(_, (_, _, count))| (*count as f64) > mean)
        .map(|(student_id, (name, department, meals_present))| AboveAverageRow {
            student_id,
            name,
            department,
            meals_present,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.meals_present
            .cmp(&a.meals_present)
            .then(a.student_id.cmp(&b.student_id))
    });

    Ok(rows)
}

/// A student ranked by present-count within their department.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct DepartmentRankRow {
    pub department: String,
    pub rank: usize,
    pub name: String,
    pub meals_present: i64,
}

pub fn department_ranking(manager: &mut AttendanceManager) -> QueryResult<Vec<DepartmentRankRow>> {
    let joined = manager.all_attendance_with_students()?;

    let mut present_counts: BTreeMap<i32, (String, String, i64)> = BTreeMap::new();
    for (record, student) in joined {
        if record.is_present {
            let entry = present_counts
                .entry(student.student_id)
                .or_insert((student.name.clone(), student.department.clone(), 0));
            entry.2 += 1;
        }
    }

    let mut flat: Vec<(String, String, i64)> = present_counts.into_values().collect();
    flat.sort_by(|a, b| a.0.cmp(&b.0).then(b.2.cmp(&a.2)).then(a.1.cmp(&b.1)));

    let mut rows = Vec::with_capacity(flat.len());
    let mut current_dept: Option<&str> = None;
    let mut rank = 0;

    for (department, name, meals_present) in &flat {
        if current_dept != Some(department.as_str()) {
            rank = 1;
        } else {
            rank += 1;
        }
        current_dept = Some(department.as_str());

        rows.push(DepartmentRankRow {
            department: department.clone(),
            rank,
            name: name.clone(),
            meals_present: *meals_present,
        });
    }

    Ok(rows)
}

/// One line of the day-by-day attendance report.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct DailyReportRow {
    pub date: NaiveDate,
    pub day_name: String,
    pub day_type: String,
    pub meal_type: MealType,
    pub student_name: String,
    pub department: String,
    pub room_no: String,
    pub status: String,
}

/// Attendance rows from `since` onward, newest first, capped at `limit` rows.
pub fn daily_report(
    manager: &mut AttendanceManager,
    since: NaiveDate,
    limit: usize,
) -> QueryResult<Vec<DailyReportRow>> {
    let mut joined = manager.all_attendance_with_students()?;
    joined.retain(|(record, _)| record.date >= since);
    joined.sort_by(|(a, sa), (b, sb)| {
        b.date
            .cmp(&a.date)
            .then(a.meal_type.as_str().cmp(b.meal_type.as_str()))
            .then(sa.name.cmp(&sb.name))
    });

    let rows = joined
        .into_iter()
        .take(limit)
        .map(|(record, student)| DailyReportRow {
            date: record.date,
            day_name: record.date.format("%A").to_string(),
            day_type: if is_weekend(record.date) {
                "Weekend".to_string()
            } else {
                "Weekday".to_string()
            },
            meal_type: record.meal_type,
            student_name: student.name,
            department: student.department,
            room_no: student.room_no,
            status: if record.is_present {
                "Present".to_string()
            } else {
                "Absent".to_string()
            },
        })
        .collect();

    Ok(rows)
}

/// A student whose present-rate sits below the alert threshold. Students with
/// no attendance records at all are flagged with a rate of zero.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct LowAttendanceRow {
    pub student_id: i32,
    pub name: String,
    pub department: String,
    pub total_meals: i64,
    pub attended: i64,
    pub attendance_rate: f64,
}

pub fn low_attendance(
    manager: &mut AttendanceManager,
    threshold: f64,
) -> QueryResult<Vec<LowAttendanceRow>> {
    let roster = manager.get_roster()?;
    let records = manager.all_attendance()?;

    let mut totals: HashMap<i32, (i64, i64)> = HashMap::new();
    for record in &records {
        let entry = totals.entry(record.student_id).or_insert((0, 0));
        entry.0 += 1;
        if record.is_present {
            entry.1 += 1;
        }
    }

    let mut rows: Vec<LowAttendanceRow> = roster
        .into_iter()
        .filter_map(|student| {
            let (total, attended) = totals
                .get(&student.student_id)
                .copied()
                .unwrap_or((0, 0));

            let rate = if total == 0 {
                0.0
            } else {
                attended as f64 / total as f64 * 100.0
            };

            (total == 0 || rate < threshold).then(|| LowAttendanceRow {
                student_id: student.student_id,
                name: student.name,
                department: student.department,
                total_meals: total,
                attended,
                attendance_rate: round2(rate),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.attendance_rate
            .partial_cmp(&b.attendance_rate)
            .expect("attendance rates are never NaN")
            .then(a.student_id.cmp(&b.student_id))
    });

    Ok(rows)
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAttendance, NewStudent};
    use approx::assert_relative_eq;

    /// Three students: one perfect attender, one half-and-half, one with no
    /// records at all.
    fn seeded_manager() -> AttendanceManager {
        let mut manager = AttendanceManager::open_in_memory();

        let join = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        manager
            .insert_students(&[
                NewStudent { name: "Arif Hossain", room_no: "101A", department: "CSE", join_date: join },
                NewStudent { name: "Mitu Rahman", room_no: "202B", department: "EEE", join_date: join },
                NewStudent { name: "Sadia Islam", room_no: "303C", department: "CSE", join_date: join },
            ])
            .unwrap();

        let day1 = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap(); // Saturday

        // Student 1: present for four meals.
        // Student 2: present twice, absent twice.
        let entries = [
            (1, day1, MealType::Breakfast, true),
            (1, day1, MealType::Lunch, true),
            (1, day2, MealType::Lunch, true),
            (1, day2, MealType::Dinner, true),
            (2, day1, MealType::Breakfast, true),
            (2, day1, MealType::Lunch, false),
            (2, day2, MealType::Lunch, true),
            (2, day2, MealType::Dinner, false),
        ];
        for (student_id, date, meal_type, is_present) in entries {
            manager
                .insert_attendance(&NewAttendance { student_id, date, meal_type, is_present })
                .unwrap();
        }

        manager
    }

    #[test]
    fn student_summary_totals() {
        let mut manager = seeded_manager();
        let rows = student_summary(&mut manager).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Arif Hossain");
        assert_eq!(rows[0].total_meals, 4);
        assert_eq!(rows[0].meals_present, 4);
        assert_eq!(rows[0].meals_absent, 0);
        assert_eq!(rows[1].meals_present, 2);
        assert_eq!(rows[1].meals_absent, 2);
    }

    #[test]
    fn meal_statistics_counts_unique_students() {
        let mut manager = seeded_manager();
        let rows = meal_statistics(&mut manager).unwrap();

        let lunch = rows.iter().find(|r| r.meal_type == MealType::Lunch).unwrap();
        assert_eq!(lunch.unique_students, 2);
        assert_eq!(lunch.total_records, 4);
        assert_eq!(lunch.total_present, 3);
        assert_relative_eq!(lunch.attendance_pct, 75.0);

        // Lunch has the most present records, so it leads the report.
        assert_eq!(rows[0].meal_type, MealType::Lunch);
    }

    #[test]
    fn above_average_excludes_the_mean_and_below() {
        let mut manager = seeded_manager();
        let rows = above_average_students(&mut manager).unwrap();

        // Present counts are 4 and 2; mean is 3, so only the first student
        // qualifies.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Arif Hossain");
        assert_eq!(rows[0].meals_present, 4);
    }

    #[test]
    fn department_ranking_restarts_per_department() {
        let mut manager = seeded_manager();

        // Give the third student one present meal so CSE has two ranked rows.
        manager
            .insert_attendance(&NewAttendance {
                student_id: 3,
                date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
                meal_type: MealType::Dinner,
                is_present: true,
            })
            .unwrap();

        let rows = department_ranking(&mut manager).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].department, "CSE");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].name, "Arif Hossain");
        assert_eq!(rows[1].department, "CSE");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[2].department, "EEE");
        assert_eq!(rows[2].rank, 1);
    }

    #[test]
    fn daily_report_filters_orders_and_limits() {
        let mut manager = seeded_manager();
        let since = NaiveDate::from_ymd_opt(2024, 12, 26).unwrap();

        let rows = daily_report(&mut manager, since, 20).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.date >= since));
        assert_eq!(rows[0].day_name, "Saturday");
        assert_eq!(rows[0].day_type, "Weekend");

        let capped = daily_report(&mut manager, since, 2).unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn low_attendance_includes_students_without_records() {
        let mut manager = seeded_manager();
        let rows = low_attendance(&mut manager, 75.0).unwrap();

        // The record-less student sorts first with a zero rate; the
        // half-and-half student follows at 50%.
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Sadia Islam");
        assert_eq!(rows[0].total_meals, 0);
        assert_relative_eq!(rows[0].attendance_rate, 0.0);
        assert_eq!(rows[1].name, "Mitu Rahman");
        assert_relative_eq!(rows[1].attendance_rate, 50.0);
    }

    #[test]
    fn perfect_attendance_is_not_flagged() {
        let mut manager = seeded_manager();
        let rows = low_attendance(&mut manager, 75.0).unwrap();
        assert!(rows.iter().all(|r| r.name != "Arif Hossain"));
    }
}
