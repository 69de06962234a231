//! Creates the mess-attendance schema and optionally imports a roster CSV.
//!
//! Usage: `setup [roster.csv]`. The database location comes from the
//! `DATABASE_URL` environment variable.

use anyhow::Result;
use mess_attendance::manager::AttendanceManager;
use mess_attendance::roster;
use std::env;
use std::path::PathBuf;

pub fn main() -> Result<()> {
    let mut manager = AttendanceManager::connect();
    manager.initialize_schema()?;
    println!("Schema created");

    if let Some(path) = env::args().nth(1).map(PathBuf::from) {
        let imported = roster::import_roster(&mut manager, &path)?;
        println!("Imported {} students from {}", imported, path.display());
    }

    println!("Roster now holds {} students", manager.num_students()?);
    Ok(())
}
