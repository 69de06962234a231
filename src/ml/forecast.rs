//! Day-ahead attendance forecasts and mess resource planning.

use crate::ml::features::calendar_features;
use crate::ml::model::TrainedModel;
use crate::models::MealType;
use chrono::{Days, NaiveDate};
use tabled::Tabled;

/// Predicts the attendance head-count for one date and meal, rounded to a
/// whole student and clamped at zero.
pub fn predict_count(model: &TrainedModel, date: NaiveDate, meal: MealType) -> i64 {
    let predicted = model.predict(&calendar_features(date, meal));
    predicted.round().max(0.0) as i64
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub day: String,
    pub weekend: String,
    pub predicted_attendance: i64,
}

/// Forecasts attendance for `days` consecutive days of one meal, starting at
/// `start`.
pub fn forecast(
    model: &TrainedModel,
    start: NaiveDate,
    meal: MealType,
    days: u32,
) -> Vec<ForecastRow> {
    (0..days)
        .map(|offset| {
            let date = start + Days::new(u64::from(offset));
            let features = calendar_features(date, meal);

            ForecastRow {
                date,
                day: date.format("%A").to_string(),
                weekend: if features[1] > 0.0 { "Yes" } else { "No" }.to_string(),
                predicted_attendance: predict_count(model, date, meal),
            }
        })
        .collect()
}

/// Food-preparation recommendation derived from a forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodPlan {
    pub average_attendance: f64,
    /// Kilograms to prepare per meal.
    pub kg_per_meal: f64,
    /// Kilograms for the whole forecast window, one meal per day.
    pub total_kg: f64,
}

pub fn plan_food(rows: &[ForecastRow], kg_per_student: f64) -> FoodPlan {
    let average_attendance = if rows.is_empty() {
        0.0
    } else {
        rows.iter()
            .map(|r| r.predicted_attendance as f64)
            .sum::<f64>()
            / rows.len() as f64
    };

    let kg_per_meal = average_attendance * kg_per_student;
    FoodPlan {
        average_attendance,
        kg_per_meal,
        total_kg: kg_per_meal * rows.len() as f64,
    }
}
