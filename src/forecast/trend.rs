//! Linear trend estimation.

use serde::{Deserialize, Serialize};

/// Absolute slope, in units per period, beyond which a series is trending.
/// Not normalized by the series level.
pub const TREND_SLOPE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Direction implied by a per-period slope.
    pub fn from_slope(slope: f64) -> Self {
        if slope > TREND_SLOPE_THRESHOLD {
            TrendDirection::Increasing
        } else if slope < -TREND_SLOPE_THRESHOLD {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendInfo {
    pub direction: TrendDirection,
    /// Least-squares slope against observation index.
    pub slope: f64,
    /// Relative change from the first to the last observation.
    pub rate: f64,
}

/// Fit an ordinary least-squares line of value against index `0..n`.
///
/// `rate` is computed from the endpoints only and is independent of the
/// fitted slope. It is 0 for fewer than two points or a zero first value.
pub fn estimate_trend(values: &[f64]) -> TrendInfo {
    let slope = least_squares_slope(values);

    let rate = match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if values.len() > 1 && first != 0.0 => (last - first) / first,
        _ => 0.0,
    };

    TrendInfo {
        direction: TrendDirection::from_slope(slope),
        slope,
        rate,
    }
}

fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        covariance += dx * (y - y_mean);
        variance += dx * dx;
    }

    if variance == 0.0 {
        0.0
    } else {
        covariance / variance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_is_stable() {
        for level in [0.0, 1.0, 333.3, 1250.0] {
            let trend = estimate_trend(&[level; 15]);
            assert_eq!(trend.direction, TrendDirection::Stable);
            assert_eq!(trend.rate, 0.0);
            assert!(trend.slope.abs() < 1e-9);
        }
    }

    #[test]
    fn test_increasing_linear_series() {
        let values: Vec<f64> = (0..12).map(|i| 100.0 + 10.0 * i as f64).collect();
        let trend = estimate_trend(&values);

        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert!((trend.slope - 10.0).abs() < 1e-9);
        assert_eq!(trend.rate, (values[11] - values[0]) / values[0]);
    }

    #[test]
    fn test_decreasing_series() {
        let values: Vec<f64> = (0..10).map(|i| 500.0 - 6.0 * i as f64).collect();
        let trend = estimate_trend(&values);

        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert!((trend.slope + 6.0).abs() < 1e-9);
        assert!(trend.rate < 0.0);
    }

    #[test]
    fn test_threshold_is_absolute() {
        // Slope of 4 units/period on a tiny base is still stable
        let values: Vec<f64> = (0..10).map(|i| 1.0 + 4.0 * i as f64).collect();
        let trend = estimate_trend(&values);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert!(trend.rate > 30.0);
    }

    #[test]
    fn test_single_and_empty() {
        let single = estimate_trend(&[42.0]);
        assert_eq!(single.slope, 0.0);
        assert_eq!(single.rate, 0.0);
        assert_eq!(single.direction, TrendDirection::Stable);

        let empty = estimate_trend(&[]);
        assert_eq!(empty.rate, 0.0);
        assert_eq!(empty.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_zero_first_value_rate() {
        let trend = estimate_trend(&[0.0, 50.0, 100.0]);
        assert_eq!(trend.rate, 0.0);
        assert_eq!(trend.direction, TrendDirection::Increasing);
    }
}
