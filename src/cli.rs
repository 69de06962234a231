//! This module contains the command-line interface [`Cli`] parser for managing student meal
//! attendance records and the forecasting pipeline.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::models::MealType;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(about = "Hostel mess attendance tracking and forecasting")]
pub struct Cli {
    /// The different commands available for managing meal attendance records.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new student to the roster.
    AddStudent {
        name: String,
        room_no: String,
        department: String,
        /// Date the student joined the hostel, e.g. 2024-01-10.
        join_date: NaiveDate,
    },

    /// Remove a student (and their attendance records) from the roster.
    RemoveStudent { student_id: i32 },

    /// Update a student's details; omitted fields are left unchanged.
    UpdateStudent {
        student_id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        room_no: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },

    /// Display the full roster.
    ShowRoster,

    /// Display one student's details.
    ShowStudent { student_id: i32 },

    /// Record a student's attendance for one meal.
    RecordMeal {
        student_id: i32,
        date: NaiveDate,
        meal: MealType,
        /// Record the student as absent instead of present.
        #[arg(long)]
        absent: bool,
    },

    /// Change the presence flag of an attendance record.
    UpdateMeal {
        attendance_id: i32,
        /// Mark the record present; omit to mark it absent.
        #[arg(long)]
        present: bool,
    },

    /// Delete an attendance record.
    DeleteMeal { attendance_id: i32 },

    /// Show all attendance for one date.
    ShowDay { date: NaiveDate },

    /// Record a special event that may affect mess turnout.
    AddEvent {
        date: NaiveDate,
        name: String,
        expected_impact: String,
    },

    /// List all special events.
    ListEvents,

    /// Per-student attendance totals.
    SummaryReport,

    /// Per-meal turnout statistics.
    MealReport,

    /// Students attending more than the roster average.
    AboveAverage,

    /// Students ranked by attendance within each department.
    DepartmentRanking,

    /// Day-by-day attendance report from a cutoff date.
    DailyReport {
        since: NaiveDate,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Students below the low-attendance threshold.
    LowAttendance,

    /// Export the per-(date, meal) attendance snapshot CSV.
    ExportSummary,

    /// Exploratory statistics over the exported snapshot.
    Eda,

    /// Derive calendar features from the snapshot.
    BuildFeatures,

    /// Shuffle and split the feature rows into train and test CSVs.
    SplitData {
        #[arg(long, default_value_t = 0.2)]
        test_fraction: f64,
        #[arg(long, default_value_t = crate::ml::split::DEFAULT_SEED)]
        seed: u64,
    },

    /// Fit the regression model and report its accuracy.
    Train,

    /// Predict attendance for one date and meal.
    Predict { date: NaiveDate, meal: MealType },

    /// Forecast attendance for the coming days of one meal.
    Forecast { start_date: NaiveDate, meal: MealType },
}
