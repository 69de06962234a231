use crate::analytics::EdaReport;
use crate::manager::AttendanceManager;
use crate::ml::forecast::{FoodPlan, ForecastRow};
use crate::ml::model::{Evaluation, TrainedModel};
use crate::models::{AttendanceRecord, SpecialEvent};
use diesel::result::QueryResult;
use tabled::{settings::Style, Table, Tabled};

fn print_table<T: Tabled>(title: &str, rows: Vec<T>) {
    if rows.is_empty() {
        println!("{title}: no rows");
        return;
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{title}:\n{table}");
}

/// Pretty prints the full roster.
pub fn show_roster(manager: &mut AttendanceManager) -> QueryResult<()> {
    let roster = manager.get_roster()?;
    print_table("Roster", roster);
    Ok(())
}

/// Prints all info about a student, including their attendance totals.
pub fn show_student_info(manager: &mut AttendanceManager, student_id: i32) -> QueryResult<()> {
    let student = match manager.get_student(student_id) {
        Ok(s) => s,
        Err(_) => {
            eprintln!("Student with ID '{student_id}' not found.");
            return Ok(());
        }
    };

    println!("Student Information:\n{:#?}", student);

    let records: Vec<AttendanceRecord> = manager
        .all_attendance()?
        .into_iter()
        .filter(|r| r.student_id == student_id)
        .collect();

    let present = records.iter().filter(|r| r.is_present).count();
    println!(
        "Attendance: {} records, {} present, {} absent",
        records.len(),
        present,
        records.len() - present
    );

    Ok(())
}

/// Pretty prints the attendance for a given date.
pub fn show_day_attendance(manager: &mut AttendanceManager, day: chrono::NaiveDate) -> QueryResult<()> {
    #[derive(Tabled)]
    struct DayRow {
        meal_type: crate::models::MealType,
        name: String,
        room_no: String,
        status: String,
    }

    let rows: Vec<DayRow> = manager
        .attendance_on(day)?
        .into_iter()
        .map(|(record, student)| DayRow {
            meal_type: record.meal_type,
            name: student.name,
            room_no: student.room_no,
            status: if record.is_present {
                "Present".to_string()
            } else {
                "Absent".to_string()
            },
        })
        .collect();

    print_table(&format!("Attendance for {day}"), rows);
    Ok(())
}

/// Pretty prints all special events.
pub fn show_special_events(manager: &mut AttendanceManager) -> QueryResult<()> {
    let events: Vec<SpecialEvent> = manager.special_events()?;
    print_table("Special events", events);
    Ok(())
}

/// Pretty prints any report whose rows derive [`Tabled`].
pub fn show_report<T: Tabled>(title: &str, rows: Vec<T>) {
    print_table(title, rows);
}

/// Prints the exploratory statistics report.
pub fn show_eda(report: &EdaReport) {
    println!("Snapshot statistics:");
    println!("  records:            {}", report.total_records);
    println!("  mean attendance:    {:.2}", report.mean);
    println!("  min / max:          {} / {}", report.min, report.max);
    println!("  std deviation:      {:.2}", report.std_dev);
    println!(
        "  quartiles:          Q1 {:.2}, median {:.2}, Q3 {:.2}",
        report.q1, report.median, report.q3
    );

    println!("\nMeal-wise mean attendance:");
    for (meal, mean) in &report.meal_means {
        println!("  {meal}: {mean:.2}");
    }

    println!("\nMeal-wise record counts:");
    for (meal, count) in &report.meal_counts {
        println!("  {meal}: {count}");
    }

    println!("\nDay-wise mean attendance:");
    for (day, mean) in &report.day_means {
        println!("  {day}: {mean:.2}");
    }

    println!("\nWeekday vs weekend:");
    println!("  weekday mean: {:.2}", report.weekday_mean);
    println!("  weekend mean: {:.2}", report.weekend_mean);

    let (lower, upper) = report.outlier_bounds;
    println!(
        "\nOutliers (IQR bounds {:.2} .. {:.2}): {}",
        lower,
        upper,
        report.outliers.len()
    );
    for row in &report.outliers {
        println!(
            "  {} {} attended {}",
            row.date, row.meal_type, row.actual_attended
        );
    }
}

/// Prints the trained model and its evaluation metrics.
pub fn show_training_results(model: &TrainedModel, evaluation: &Evaluation) {
    println!("Model coefficients:");
    for (name, coefficient) in model.feature_names.iter().zip(&model.coefficients) {
        println!("  {name}: {coefficient:.4}");
    }
    println!("  intercept: {:.4}", model.intercept);

    println!("\nTraining set:");
    println!("  MAE:  {:.2} students", evaluation.train.mae);
    println!("  RMSE: {:.2} students", evaluation.train.rmse);
    println!("  R²:   {:.4}", evaluation.train.r_squared);

    println!("\nTest set:");
    println!("  MAE:  {:.2} students", evaluation.test.mae);
    println!("  RMSE: {:.2} students", evaluation.test.rmse);
    println!("  R²:   {:.4}", evaluation.test.r_squared);

    print_table("\nSample predictions", evaluation.samples.clone());
}

/// Prints a forecast table and the food-preparation recommendation.
pub fn show_forecast(rows: Vec<ForecastRow>, plan: &FoodPlan) {
    print_table("Forecast", rows);

    println!("\nResource planning:");
    println!("  average predicted attendance: {:.0} students", plan.average_attendance);
    println!("  recommended food per meal:    {:.2} kg", plan.kg_per_meal);
    println!("  total for the window:         {:.2} kg", plan.total_kg);
}
