//! Roster import from CSV files.
//!
//! The hostel office hands over the roster as a CSV with `name`, `room_no`,
//! `department`, and `join_date` columns. The `setup` binary loads it into
//! the `students` table.

use crate::manager::AttendanceManager;
use crate::models::NewStudent;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, PartialEq)]
pub struct RosterRow {
    pub name: String,
    pub room_no: String,
    pub department: String,
    pub join_date: NaiveDate,
}

/// Reads a roster CSV into memory.
pub fn load_roster_csv(path: &Path) -> Result<Vec<RosterRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open roster file {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: RosterRow = record.context("malformed roster row")?;
        rows.push(row);
    }

    Ok(rows)
}

/// Loads a roster CSV and inserts every row into the database. Returns the
/// number of students imported.
pub fn import_roster(manager: &mut AttendanceManager, path: &Path) -> Result<usize> {
    let rows = load_roster_csv(path)?;

    let new_students: Vec<NewStudent> = rows
        .iter()
        .map(|row| NewStudent {
            name: &row.name,
            room_no: &row.room_no,
            department: &row.department,
            join_date: row.join_date,
        })
        .collect();

    manager
        .insert_students(&new_students)
        .context("failed to insert imported roster")?;

    Ok(new_students.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_roster_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,room_no,department,join_date").unwrap();
        writeln!(file, "Arif Hossain,101A,CSE,2024-01-10").unwrap();
        writeln!(file, "Mitu Rahman,202B,EEE,2024-02-01").unwrap();

        let rows = load_roster_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Arif Hossain");
        assert_eq!(
            rows[1].join_date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[test]
    fn import_inserts_students() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,room_no,department,join_date").unwrap();
        writeln!(file, "Arif Hossain,101A,CSE,2024-01-10").unwrap();

        let mut manager = AttendanceManager::open_in_memory();
        let imported = import_roster(&mut manager, file.path()).unwrap();

        assert_eq!(imported, 1);
        assert_eq!(manager.num_students().unwrap(), 1);
    }

    #[test]
    fn rejects_malformed_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,room_no,department,join_date").unwrap();
        writeln!(file, "Broken Row,101A,CSE,not-a-date").unwrap();

        assert!(load_roster_csv(file.path()).is_err());
    }
}
