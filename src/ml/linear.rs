//! Ordinary-least-squares linear regression.
//!
//! The fit solves the normal equations `(XᵀX) β = Xᵀy` with an intercept
//! column prepended to the design matrix, using Gaussian elimination with
//! partial pivoting. With five calendar features the system is 6×6, so a
//! dense solve is plenty.

use std::fmt;

#[derive(Debug, PartialEq)]
pub enum FitError {
    /// No training rows were supplied.
    EmptyTrainingSet,
    /// A row's feature count disagrees with the rest, or features and targets
    /// have different lengths.
    DimensionMismatch { expected: usize, found: usize },
    /// The normal equations are singular, e.g. a feature column is constant
    /// or two columns are linearly dependent.
    SingularSystem,
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::EmptyTrainingSet => write!(f, "cannot fit a model on zero rows"),
            FitError::DimensionMismatch { expected, found } => {
                write!(f, "expected {expected} values per row, found {found}")
            }
            FitError::SingularSystem => {
                write!(f, "normal equations are singular; check for constant or duplicate features")
            }
        }
    }
}

impl std::error::Error for FitError {}

/// A fitted linear model: `y = intercept + coefficients · x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    /// Fits the model to `rows` (one feature vector per row) and `targets`.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Result<Self, FitError> {
        if rows.is_empty() {
            return Err(FitError::EmptyTrainingSet);
        }
        if rows.len() != targets.len() {
            return Err(FitError::DimensionMismatch {
                expected: rows.len(),
                found: targets.len(),
            });
        }

        let num_features = rows[0].len();
        for row in rows {
            if row.len() != num_features {
                return Err(FitError::DimensionMismatch {
                    expected: num_features,
                    found: row.len(),
                });
            }
        }

        // Dimension of the augmented system: intercept plus each feature.
        let n = num_features + 1;

        // Accumulate XᵀX and Xᵀy directly; the design matrix itself is never
        // materialized.
        let mut xtx = vec![vec![0.0f64; n]; n];
        let mut xty = vec![0.0f64; n];

        for (row, &y) in rows.iter().zip(targets) {
            let mut augmented = Vec::with_capacity(n);
            augmented.push(1.0);
            augmented.extend_from_slice(row);

            for i in 0..n {
                xty[i] += augmented[i] * y;
                for j in 0..n {
                    xtx[i][j] += augmented[i] * augmented[j];
                }
            }
        }

        let beta = solve(xtx, xty)?;

        Ok(Self {
            intercept: beta[0],
            coefficients: beta[1..].to_vec(),
        })
    }

    /// Predicts the target for one feature vector.
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        assert_eq!(
            features.len(),
            self.coefficients.len(),
            "feature count must match the fitted model"
        );

        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    /// Predicts the target for every row.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}

/// Solves `a x = b` in place via Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, FitError> {
    let n = b.len();
    const PIVOT_EPSILON: f64 = 1e-10;

    for col in 0..n {
        // Pick the row with the largest magnitude in this column.
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .expect("matrix entries are finite")
            })
            .expect("column range is non-empty");

        if a[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(FitError::SingularSystem);
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut x = vec![0.0f64; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in (row + 1)..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_a_one_dimensional_line() {
        // y = 2x + 1, fit exactly.
        let rows: Vec<Vec<f64>> = (0..10).map(|x| vec![x as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|x| 2.0 * x as f64 + 1.0).collect();

        let model = LinearRegression::fit(&rows, &targets).unwrap();
        assert_relative_eq!(model.intercept, 1.0, epsilon = 1e-8);
        assert_relative_eq!(model.coefficients[0], 2.0, epsilon = 1e-8);
        assert_relative_eq!(model.predict_one(&[20.0]), 41.0, epsilon = 1e-6);
    }

    #[test]
    fn recovers_a_multivariate_plane() {
        // y = 3 + 2a - b over a small grid.
        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for a in 0..6 {
            for b in 0..6 {
                rows.push(vec![a as f64, b as f64]);
                targets.push(3.0 + 2.0 * a as f64 - b as f64);
            }
        }

        let model = LinearRegression::fit(&rows, &targets).unwrap();
        assert_relative_eq!(model.intercept, 3.0, epsilon = 1e-8);
        assert_relative_eq!(model.coefficients[0], 2.0, epsilon = 1e-8);
        assert_relative_eq!(model.coefficients[1], -1.0, epsilon = 1e-8);
    }

    #[test]
    fn averages_noise_around_the_mean() {
        // Constant-feature-free data with symmetric noise: the intercept
        // should land on the mean of the targets.
        let rows: Vec<Vec<f64>> = vec![vec![0.0], vec![1.0], vec![0.0], vec![1.0]];
        let targets = vec![9.0, 11.0, 11.0, 9.0];

        let model = LinearRegression::fit(&rows, &targets).unwrap();
        assert_relative_eq!(model.predict_one(&[0.0]), 10.0, epsilon = 1e-8);
        assert_relative_eq!(model.predict_one(&[1.0]), 10.0, epsilon = 1e-8);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            LinearRegression::fit(&[], &[]),
            Err(FitError::EmptyTrainingSet)
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        let targets = vec![1.0, 2.0];
        assert!(matches!(
            LinearRegression::fit(&rows, &targets),
            Err(FitError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_singular_systems() {
        // Two identical columns make XᵀX singular.
        let rows: Vec<Vec<f64>> = (0..10).map(|x| vec![x as f64, x as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|x| x as f64).collect();

        assert_eq!(
            LinearRegression::fit(&rows, &targets),
            Err(FitError::SingularSystem)
        );
    }
}
