//! Series utilities: averages, outliers and forecast error metrics.

use serde::{Deserialize, Serialize};

use super::round_to;

/// Default z-score above which a point is reported as an outlier.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 2.5;

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Trailing moving average. Windows shorter than `window` at the start of the
/// series average whatever points are available.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&values[start..=i])
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    pub index: usize,
    pub value: f64,
    pub z_score: f64,
}

/// Points whose population z-score exceeds `threshold`.
pub fn detect_outliers(values: &[f64], threshold: f64) -> Vec<Outlier> {
    let mu = mean(values);
    let variance = mean(&values.iter().map(|v| (v - mu).powi(2)).collect::<Vec<_>>());
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let z_score = ((value - mu) / std_dev).abs();
            (z_score > threshold).then_some(Outlier {
                index,
                value,
                z_score,
            })
        })
        .collect()
}

/// Mean absolute percentage error over pairs with a non-zero actual.
/// `None` when no such pair exists.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| ((a - p) / a).abs())
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(mean(&errors) * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub mape: f64,
}

impl AccuracyMetrics {
    /// Compare paired actual and predicted values, rounded to 2 decimals.
    /// MAPE is reported as 0 when any actual value is 0.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        let diffs: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| a - p).collect();

        let mae = mean(&diffs.iter().map(|d| d.abs()).collect::<Vec<_>>());
        let mse = mean(&diffs.iter().map(|d| d * d).collect::<Vec<_>>());
        let mape = if actual.iter().any(|a| *a == 0.0) {
            0.0
        } else {
            mape(actual, predicted).unwrap_or(0.0)
        };

        Self {
            mae: round_to(mae, 2),
            mse: round_to(mse, 2),
            rmse: round_to(mse.sqrt(), 2),
            mape: round_to(mape, 2),
        }
    }
}
