//! Regression evaluation metrics.

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return 0.0;
    }

    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Mean squared error.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return 0.0;
    }

    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

/// Root mean squared error.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Coefficient of determination. 1.0 for a perfect fit; 0.0 for a model no
/// better than predicting the mean; negative for one that is worse. Defined
/// as 0.0 when the actual values have no variance.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return 0.0;
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if total == 0.0 {
        return 0.0;
    }

    let residual: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    1.0 - residual / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_predictions() {
        let actual = [1.0, 2.0, 3.0];
        assert_relative_eq!(mae(&actual, &actual), 0.0);
        assert_relative_eq!(rmse(&actual, &actual), 0.0);
        assert_relative_eq!(r_squared(&actual, &actual), 1.0);
    }

    #[test]
    fn known_errors() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [2.0, 2.0, 2.0, 4.0];

        assert_relative_eq!(mae(&actual, &predicted), 0.5);
        assert_relative_eq!(mse(&actual, &predicted), 0.5);
        assert_relative_eq!(rmse(&actual, &predicted), 0.5f64.sqrt());
    }

    #[test]
    fn mean_predictor_scores_zero() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        assert_relative_eq!(r_squared(&actual, &predicted), 0.0);
    }

    #[test]
    fn worse_than_mean_is_negative() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [3.0, 2.0, 1.0];
        assert!(r_squared(&actual, &predicted) < 0.0);
    }

    #[test]
    fn zero_variance_is_defined() {
        let actual = [5.0, 5.0, 5.0];
        let predicted = [4.0, 5.0, 6.0];
        assert_relative_eq!(r_squared(&actual, &predicted), 0.0);
    }
}
