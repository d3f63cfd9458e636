//! Forecast orchestration.
//!
//! [`ForecastEngine::forecast`] fits trend and seasonality on histories of at
//! least [`MIN_HISTORY_POINTS`] observations and falls back to a flat noisy band
//! around the latest known level otherwise. [`ForecastEngine::forecast_simple`]
//! is a separate, history-free path used for catalog-wide scans.

use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use super::metrics::{mape, mean};
use super::seasonal_index::{SeasonalIndex, month_name, target_month};
use super::seasonality::{DEFAULT_PEAK_MONTH, detect_seasonality};
use super::trend::{TrendDirection, estimate_trend};
use super::{ConfidenceInterval, Forecast, ForecastMethod, round_to};
use crate::model::{DemandSeries, Product};
use crate::random::RandomSource;

/// Histories shorter than this take the fallback path.
pub const MIN_HISTORY_POINTS: usize = 10;

/// Number of trailing observations averaged into the baseline demand.
pub const BASELINE_WINDOW: usize = 6;

/// Noise standard deviation as a fraction of the undisturbed prediction.
pub const NOISE_RATIO: f64 = 0.05;

/// Half-width of the uniform band used by the fallback paths.
pub const FALLBACK_SPREAD: f64 = 0.1;

/// Accuracy reported when there is too little history to evaluate.
pub const DEFAULT_ACCURACY: f64 = 75.0;

/// Share of the history used for training in the holdout evaluation.
pub const TRAIN_SHARE: f64 = 0.8;

const FITTED_CONFIDENCE: f64 = 0.95;
const FALLBACK_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    seasonal_index: SeasonalIndex,
}

impl ForecastEngine {
    pub fn new(seasonal_index: SeasonalIndex) -> Self {
        Self { seasonal_index }
    }

    /// Forecast `periods` months after the end of `series`.
    ///
    /// Short histories fall back to a band around the last observed value.
    /// `today` anchors the seasonal lookup.
    pub fn forecast<R: RandomSource + ?Sized>(
        &self,
        series: &DemandSeries,
        periods: usize,
        today: NaiveDate,
        rng: &mut R,
    ) -> Forecast {
        let base = series.last_value().unwrap_or(0.0);
        self.forecast_with_base(series, periods, base, today, rng)
    }

    /// Like [`forecast`](Self::forecast), but with an explicit base level for
    /// the fallback path (typically the product's current stock).
    pub fn forecast_with_base<R: RandomSource + ?Sized>(
        &self,
        series: &DemandSeries,
        periods: usize,
        fallback_base: f64,
        today: NaiveDate,
        rng: &mut R,
    ) -> Forecast {
        let start = series.last_month().unwrap_or_else(|| first_of_month(today));

        if series.len() < MIN_HISTORY_POINTS {
            debug!(
                points = series.len(),
                periods, "Insufficient history, using fallback forecast"
            );
            return flat_band(fallback_base, periods, start, rng);
        }

        let values = series.values();
        let trend = estimate_trend(&values);
        let seasonality = detect_seasonality(series);

        let recent = &values[values.len().saturating_sub(BASELINE_WINDOW)..];
        let base_demand = mean(recent);

        let predictions: Vec<f64> = (0..periods)
            .map(|i| {
                let trend_adjustment = trend.slope * i as f64;
                let month = target_month(today.month(), i);
                let factor = self.seasonal_index.factor(month);

                let undisturbed = (base_demand + trend_adjustment) * factor;
                let noise = rng.normal(0.0, undisturbed * NOISE_RATIO);
                round_to((undisturbed + noise).max(0.0), 2)
            })
            .collect();

        debug!(
            points = values.len(),
            periods,
            slope = trend.slope,
            seasonal = seasonality.detected,
            "Fitted trend/seasonal forecast"
        );

        Forecast {
            confidence_intervals: intervals(&predictions),
            dates: month_labels(start, periods),
            predictions,
            trend: trend.direction,
            growth_rate: trend.rate,
            has_seasonality: seasonality.detected,
            peak_month: seasonality.peak_month,
            accuracy: estimate_accuracy(&values),
            confidence: FITTED_CONFIDENCE,
            method: ForecastMethod::TrendSeasonal,
        }
    }

    /// History-free forecast: the product's current stock scaled by the
    /// seasonal table, with ±10% uniform variation.
    pub fn forecast_simple<R: RandomSource + ?Sized>(
        &self,
        product: &Product,
        periods: usize,
        today: NaiveDate,
        rng: &mut R,
    ) -> Forecast {
        let base = product.current_stock.max(0) as f64;

        let predictions: Vec<f64> = (0..periods)
            .map(|i| {
                let factor = self.seasonal_index.factor(target_month(today.month(), i));
                let variation = rng.uniform(1.0 - FALLBACK_SPREAD, 1.0 + FALLBACK_SPREAD);
                round_to(base * factor * variation, 2)
            })
            .collect();

        Forecast {
            confidence_intervals: intervals(&predictions),
            dates: month_labels(first_of_month(today), periods),
            predictions,
            trend: TrendDirection::Stable,
            growth_rate: 0.0,
            has_seasonality: true,
            peak_month: month_name(self.seasonal_index.peak_month()).to_string(),
            accuracy: DEFAULT_ACCURACY,
            confidence: FALLBACK_CONFIDENCE,
            method: ForecastMethod::SeasonalBaseline,
        }
    }
}

fn flat_band<R: RandomSource + ?Sized>(
    base: f64,
    periods: usize,
    start: NaiveDate,
    rng: &mut R,
) -> Forecast {
    let base = base.max(0.0);
    let low = base * (1.0 - FALLBACK_SPREAD);
    let high = base * (1.0 + FALLBACK_SPREAD);

    let predictions: Vec<f64> = (0..periods)
        .map(|_| round_to(rng.uniform(low, high), 2).clamp(low, high))
        .collect();

    Forecast {
        confidence_intervals: intervals(&predictions),
        dates: month_labels(start, periods),
        predictions,
        trend: TrendDirection::Stable,
        growth_rate: 0.0,
        has_seasonality: false,
        peak_month: DEFAULT_PEAK_MONTH.to_string(),
        accuracy: DEFAULT_ACCURACY,
        confidence: FALLBACK_CONFIDENCE,
        method: ForecastMethod::InsufficientHistory,
    }
}

/// Holdout accuracy score in `[0, 100]`.
///
/// The first 80% of the history trains a trailing-6 average which predicts
/// every held-out point; accuracy is `100 - MAPE`, floored at 0. Held-out
/// zeros are skipped; if nothing is left to score the result is 100.
pub fn estimate_accuracy(values: &[f64]) -> f64 {
    if values.len() < MIN_HISTORY_POINTS {
        return DEFAULT_ACCURACY;
    }

    let train_size = (values.len() as f64 * TRAIN_SHARE) as usize;
    let (train, test) = values.split_at(train_size);
    let baseline = mean(&train[train.len().saturating_sub(BASELINE_WINDOW)..]);
    let predicted = vec![baseline; test.len()];

    let error = mape(test, &predicted).unwrap_or(0.0);
    round_to((100.0 - error).max(0.0), 1)
}

fn intervals(predictions: &[f64]) -> Vec<ConfidenceInterval> {
    predictions
        .iter()
        .map(|p| ConfidenceInterval::around(*p))
        .collect()
}

/// `count` consecutive `YYYY-MM` labels starting the month after `start`.
fn month_labels(start: NaiveDate, count: usize) -> Vec<String> {
    (1..=count as u32)
        .filter_map(|offset| start.checked_add_months(Months::new(offset)))
        .map(|date| date.format("%Y-%m").to_string())
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
