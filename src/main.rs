use anyhow::{bail, Context, Result};
use clap::Parser;

use mess_attendance::cli::{Cli, Command};
use mess_attendance::manager::AttendanceManager;
use mess_attendance::models::{NewAttendance, NewSpecialEvent, NewStudent, StudentUpdate};
use mess_attendance::ml::model::TrainedModel;
use mess_attendance::ml::{features, forecast, model, split};
use mess_attendance::{analytics, display, export, load_settings, reports};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings()?;

    match cli.command {
        Command::AddStudent {
            name,
            room_no,
            department,
            join_date,
        } => {
            let mut manager = AttendanceManager::connect();
            let student = manager.insert_student(&NewStudent {
                name: &name,
                room_no: &room_no,
                department: &department,
                join_date,
            })?;
            println!("Student added with ID {}", student.student_id);
        }

        Command::RemoveStudent { student_id } => {
            let mut manager = AttendanceManager::connect();
            let student = manager
                .delete_student(student_id)
                .with_context(|| format!("no student with ID {student_id}"))?;
            println!("Removed {} (ID {})", student.name, student.student_id);
        }

        Command::UpdateStudent {
            student_id,
            name,
            room_no,
            department,
        } => {
            let changes = StudentUpdate {
                name,
                room_no,
                department,
            };
            if changes.is_empty() {
                bail!("nothing to update; pass at least one of --name, --room-no, --department");
            }

            let mut manager = AttendanceManager::connect();
            let updated = manager.update_student(student_id, &changes)?;
            if updated == 0 {
                bail!("no student with ID {student_id}");
            }
            println!("Student {student_id} updated");
        }

        Command::ShowRoster => {
            let mut manager = AttendanceManager::connect();
            display::show_roster(&mut manager)?;
        }

        Command::ShowStudent { student_id } => {
            let mut manager = AttendanceManager::connect();
            display::show_student_info(&mut manager, student_id)?;
        }

        Command::RecordMeal {
            student_id,
            date,
            meal,
            absent,
        } => {
            let mut manager = AttendanceManager::connect();
            let record = manager
                .insert_attendance(&NewAttendance {
                    student_id,
                    date,
                    meal_type: meal,
                    is_present: !absent,
                })
                .context("failed to record attendance; is the student on the roster?")?;
            println!(
                "Recorded {} for student {} on {} (ID {})",
                record.meal_type, record.student_id, record.date, record.attendance_id
            );
        }

        Command::UpdateMeal {
            attendance_id,
            present,
        } => {
            let mut manager = AttendanceManager::connect();
            let updated = manager.update_attendance(attendance_id, present)?;
            if updated == 0 {
                bail!("no attendance record with ID {attendance_id}");
            }
            println!("Attendance {attendance_id} updated");
        }

        Command::DeleteMeal { attendance_id } => {
            let mut manager = AttendanceManager::connect();
            let deleted = manager.delete_attendance(attendance_id)?;
            if deleted == 0 {
                bail!("no attendance record with ID {attendance_id}");
            }
            println!("Attendance {attendance_id} deleted");
        }

        Command::ShowDay { date } => {
            let mut manager = AttendanceManager::connect();
            display::show_day_attendance(&mut manager, date)?;
        }

        Command::AddEvent {
            date,
            name,
            expected_impact,
        } => {
            let mut manager = AttendanceManager::connect();
            let event = manager.insert_special_event(&NewSpecialEvent {
                event_date: date,
                event_name: &name,
                expected_impact: &expected_impact,
            })?;
            println!("Event '{}' recorded for {}", event.event_name, event.event_date);
        }

        Command::ListEvents => {
            let mut manager = AttendanceManager::connect();
            display::show_special_events(&mut manager)?;
        }

        Command::SummaryReport => {
            let mut manager = AttendanceManager::connect();
            let rows = reports::student_summary(&mut manager)?;
            display::show_report("Student attendance summary", rows);
        }

        Command::MealReport => {
            let mut manager = AttendanceManager::connect();
            let rows = reports::meal_statistics(&mut manager)?;
            display::show_report("Meal-wise statistics", rows);
        }

        Command::AboveAverage => {
            let mut manager = AttendanceManager::connect();
            let rows = reports::above_average_students(&mut manager)?;
            display::show_report("Students above average attendance", rows);
        }

        Command::DepartmentRanking => {
            let mut manager = AttendanceManager::connect();
            let rows = reports::department_ranking(&mut manager)?;
            display::show_report("Department-wise ranking", rows);
        }

        Command::DailyReport { since, limit } => {
            let mut manager = AttendanceManager::connect();
            let rows = reports::daily_report(&mut manager, since, limit)?;
            display::show_report(&format!("Attendance since {since}"), rows);
        }

        Command::LowAttendance => {
            let mut manager = AttendanceManager::connect();
            let rows = reports::low_attendance(&mut manager, settings.low_attendance_threshold)?;
            display::show_report(
                &format!(
                    "Students below {:.0}% attendance",
                    settings.low_attendance_threshold
                ),
                rows,
            );
        }

        Command::ExportSummary => {
            let mut manager = AttendanceManager::connect();
            let rows = export::summarize(&mut manager)?;
            let path = settings.summary_path();
            export::write_summary(&rows, &path)?;
            println!("Wrote {} rows to {}", rows.len(), path.display());
        }

        Command::Eda => {
            let rows = export::load_summary(&settings.summary_path())?;
            let report = analytics::analyze(&rows)?;
            display::show_eda(&report);
        }

        Command::BuildFeatures => {
            let rows = export::load_summary(&settings.summary_path())?;
            let engineered = features::engineer(&rows);
            let path = settings.features_path();
            features::write_features(&engineered, &path)?;
            println!("Wrote {} feature rows to {}", engineered.len(), path.display());
        }

        Command::SplitData {
            test_fraction,
            seed,
        } => {
            let rows = features::load_features(&settings.features_path())?;
            let (train, test) = split::train_test_split(rows, test_fraction, seed);

            features::write_features(&train, &settings.train_path())?;
            features::write_features(&test, &settings.test_path())?;
            println!(
                "Split {} rows into {} train / {} test",
                train.len() + test.len(),
                train.len(),
                test.len()
            );
        }

        Command::Train => {
            let train = features::load_features(&settings.train_path())?;
            let test = features::load_features(&settings.test_path())?;

            let (trained, evaluation) = model::train_and_evaluate(&train, &test)?;
            trained.save(&settings.model_path)?;

            display::show_training_results(&trained, &evaluation);
            println!("\nModel saved to {}", settings.model_path.display());
        }

        Command::Predict { date, meal } => {
            let trained = TrainedModel::load(&settings.model_path)?;
            let predicted = forecast::predict_count(&trained, date, meal);
            let weekend = features::calendar_features(date, meal)[1] > 0.0;

            println!("Date:      {} ({})", date, date.format("%A"));
            println!("Meal:      {meal}");
            println!("Weekend:   {}", if weekend { "Yes" } else { "No" });
            println!("Predicted attendance: {predicted} students");
        }

        Command::Forecast { start_date, meal } => {
            let trained = TrainedModel::load(&settings.model_path)?;
            let rows = forecast::forecast(&trained, start_date, meal, settings.forecast_days);
            let plan = forecast::plan_food(&rows, settings.food_kg_per_student);
            display::show_forecast(rows, &plan);
        }
    }

    Ok(())
}
