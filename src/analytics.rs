//! Exploratory statistics over the attendance snapshot.

use crate::export::SummaryRow;
use crate::models::MealType;
use anyhow::{bail, Result};
use std::collections::BTreeMap;

/// Descriptive statistics of the `actual_attended` column plus the grouped
/// breakdowns the mess office cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct EdaReport {
    pub total_records: usize,
    pub mean: f64,
    pub min: i64,
    pub max: i64,
    pub std_dev: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub meal_means: Vec<(MealType, f64)>,
    pub meal_counts: Vec<(MealType, usize)>,
    pub day_means: Vec<(String, f64)>,
    pub weekday_mean: f64,
    pub weekend_mean: f64,
    pub outliers: Vec<SummaryRow>,
    pub outlier_bounds: (f64, f64),
}

/// Computes the full report. Fails on an empty snapshot since every statistic
/// would be undefined.
pub fn analyze(rows: &[SummaryRow]) -> Result<EdaReport> {
    if rows.is_empty() {
        bail!("attendance snapshot is empty; export it before running the analysis");
    }

    let attended: Vec<f64> = rows.iter().map(|r| r.actual_attended as f64).collect();

    let q1 = quantile(&attended, 0.25);
    let median = quantile(&attended, 0.5);
    let q3 = quantile(&attended, 0.75);
    let iqr = q3 - q1;
    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let outliers = rows
        .iter()
        .filter(|r| {
            let v = r.actual_attended as f64;
            v < lower_bound || v > upper_bound
        })
        .cloned()
        .collect();

    let mut meal_groups: BTreeMap<i64, (MealType, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        meal_groups
            .entry(row.meal_type.encoded())
            .or_insert_with(|| (row.meal_type, Vec::new()))
            .1
            .push(row.actual_attended as f64);
    }
    let meal_means = meal_groups
        .values()
        .map(|(meal, values)| (*meal, mean(values)))
        .collect();
    let meal_counts = meal_groups
        .values()
        .map(|(meal, values)| (*meal, values.len()))
        .collect();

    // Group by weekday in calendar order, Monday first.
    const DAY_ORDER: [&str; 7] = [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ];
    let mut day_groups: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let Some(index) = DAY_ORDER.iter().position(|d| *d == row.day_of_week) {
            day_groups
                .entry(index)
                .or_default()
                .push(row.actual_attended as f64);
        }
    }
    let day_means = day_groups
        .iter()
        .map(|(index, values)| (DAY_ORDER[*index].to_string(), mean(values)))
        .collect();

    let weekday: Vec<f64> = rows
        .iter()
        .filter(|r| r.is_weekend == 0)
        .map(|r| r.actual_attended as f64)
        .collect();
    let weekend: Vec<f64> = rows
        .iter()
        .filter(|r| r.is_weekend != 0)
        .map(|r| r.actual_attended as f64)
        .collect();

    Ok(EdaReport {
        total_records: rows.len(),
        mean: mean(&attended),
        min: rows.iter().map(|r| r.actual_attended).min().unwrap_or(0),
        max: rows.iter().map(|r| r.actual_attended).max().unwrap_or(0),
        std_dev: sample_std(&attended),
        q1,
        median,
        q3,
        meal_means,
        meal_counts,
        day_means,
        weekday_mean: if weekday.is_empty() { 0.0 } else { mean(&weekday) },
        weekend_mean: if weekend.is_empty() { 0.0 } else { mean(&weekend) },
        outliers,
        outlier_bounds: (lower_bound, upper_bound),
    })
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two
/// values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Quantile with linear interpolation between the two nearest order
/// statistics.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    assert!((0.0..=1.0).contains(&q), "quantile must be in [0, 1]");
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("attendance values are never NaN"));

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}
