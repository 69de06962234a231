//! Training, evaluation, and persistence of the attendance model.

use crate::ml::features::{FeatureRow, FEATURE_NAMES};
use crate::ml::linear::LinearRegression;
use crate::ml::metrics;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tabled::Tabled;

/// How many predicted-vs-actual sample rows the evaluation keeps.
const SAMPLE_ROWS: usize = 10;

/// A fitted model in its persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl TrainedModel {
    pub fn predict(&self, features: &[f64]) -> f64 {
        assert_eq!(
            features.len(),
            self.coefficients.len(),
            "feature count must match the trained model"
        );

        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    /// Saves the model as pretty-printed JSON, creating the parent directory
    /// if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read model file {}", path.display()))?;
        serde_json::from_str(&json).context("model file is not valid JSON")
    }
}

/// Metrics for one evaluation set.
#[derive(Debug, Clone, PartialEq)]
pub struct SetMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r_squared: f64,
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct PredictionSample {
    pub actual: f64,
    pub predicted: f64,
    pub error: f64,
}

/// The result of a training run: fit quality on both sets plus a handful of
/// test-set sample rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub train: SetMetrics,
    pub test: SetMetrics,
    pub samples: Vec<PredictionSample>,
}

/// Fits the model on `train` and evaluates it on both sets.
pub fn train_and_evaluate(
    train: &[FeatureRow],
    test: &[FeatureRow],
) -> Result<(TrainedModel, Evaluation)> {
    let train_x: Vec<Vec<f64>> = train.iter().map(|r| r.features().to_vec()).collect();
    let train_y: Vec<f64> = train.iter().map(FeatureRow::target).collect();
    let test_x: Vec<Vec<f64>> = test.iter().map(|r| r.features().to_vec()).collect();
    let test_y: Vec<f64> = test.iter().map(FeatureRow::target).collect();

    let fitted = LinearRegression::fit(&train_x, &train_y)
        .context("failed to fit the attendance model")?;

    let model = TrainedModel {
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        coefficients: fitted.coefficients.clone(),
        intercept: fitted.intercept,
    };

    let train_pred = fitted.predict(&train_x);
    let test_pred = fitted.predict(&test_x);

    let samples = test_y
        .iter()
        .zip(&test_pred)
        .take(SAMPLE_ROWS)
        .map(|(&actual, &predicted)| PredictionSample {
            actual,
            predicted: (predicted * 100.0).round() / 100.0,
            error: ((actual - predicted) * 100.0).round() / 100.0,
        })
        .collect();

    let evaluation = Evaluation {
        train: SetMetrics {
            mae: metrics::mae(&train_y, &train_pred),
            rmse: metrics::rmse(&train_y, &train_pred),
            r_squared: metrics::r_squared(&train_y, &train_pred),
        },
        test: SetMetrics {
            mae: metrics::mae(&test_y, &test_pred),
            rmse: metrics::rmse(&test_y, &test_pred),
            r_squared: metrics::r_squared(&test_y, &test_pred),
        },
        samples,
    };

    Ok((model, evaluation))
}
