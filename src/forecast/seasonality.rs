//! Month-of-year seasonality detection.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::seasonal_index::month_name;
use crate::model::DemandSeries;

/// Observations needed before seasonality is tested at all.
pub const MIN_SEASONAL_OBSERVATIONS: usize = 12;

/// Normalized spread of monthly means above which seasonality is reported.
pub const VARIATION_THRESHOLD: f64 = 0.2;

/// Peak month reported when seasonality cannot be tested.
pub const DEFAULT_PEAK_MONTH: &str = "December";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityInfo {
    pub detected: bool,
    pub peak_month: String,
    pub variation: f64,
}

impl SeasonalityInfo {
    fn undetected() -> Self {
        Self {
            detected: false,
            peak_month: DEFAULT_PEAK_MONTH.to_string(),
            variation: 0.0,
        }
    }
}

/// Test a dated series for month-to-month variation.
///
/// Observations are grouped by calendar month (labels that do not parse are
/// skipped) and each group is averaged. The variation is
/// `(max_mean - min_mean) / mean_of_means`.
pub fn detect_seasonality(series: &DemandSeries) -> SeasonalityInfo {
    if series.len() < MIN_SEASONAL_OBSERVATIONS {
        return SeasonalityInfo::undetected();
    }

    let mut sums = [0.0f64; 12];
    let mut counts = [0usize; 12];
    for point in series.points() {
        if let Some(date) = point.month() {
            let slot = date.month0() as usize;
            sums[slot] += point.value;
            counts[slot] += 1;
        }
    }

    // (month, mean) in calendar order
    let monthly: Vec<(u32, f64)> = (0..12)
        .filter(|&i| counts[i] > 0)
        .map(|i| (i as u32 + 1, sums[i] / counts[i] as f64))
        .collect();

    let Some(&(first_month, first_mean)) = monthly.first() else {
        return SeasonalityInfo::undetected();
    };

    let (mut peak_month, mut max_mean, mut min_mean) = (first_month, first_mean, first_mean);
    for &(month, mean) in &monthly[1..] {
        if mean > max_mean {
            max_mean = mean;
            peak_month = month;
        }
        min_mean = min_mean.min(mean);
    }

    let mean_of_means = monthly.iter().map(|(_, m)| m).sum::<f64>() / monthly.len() as f64;
    let variation = if mean_of_means > 0.0 {
        (max_mean - min_mean) / mean_of_means
    } else {
        0.0
    };

    SeasonalityInfo {
        detected: variation > VARIATION_THRESHOLD,
        peak_month: month_name(peak_month).to_string(),
        variation,
    }
}
