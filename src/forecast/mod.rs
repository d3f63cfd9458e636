//! Demand forecasting.
//!
//! The pipeline is deliberately simple and heuristic:
//!
//! 1. [`trend`]: least-squares slope over the observation index
//! 2. [`seasonality`]: spread of month-of-year averages
//! 3. [`engine`]: recent-average baseline, plus trend, times the
//!    [`seasonal_index`] factor, plus bounded noise
//!
//! Short histories are routed to a fallback forecast rather than rejected.
//! [`Forecast::method`] records which path produced a forecast.

pub mod engine;
pub mod metrics;
pub mod seasonal_index;
pub mod seasonality;
pub mod trend;

use serde::{Deserialize, Serialize};

pub use engine::{ForecastEngine, estimate_accuracy};
pub use seasonal_index::SeasonalIndex;
pub use seasonality::{SeasonalityInfo, detect_seasonality};
pub use trend::{TrendDirection, TrendInfo, estimate_trend};

/// Half-width of the confidence band around each prediction (±15%).
pub const CONFIDENCE_BAND: f64 = 0.15;

/// Which forecasting path produced a [`Forecast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Trend and seasonality fitted on a sufficiently long history.
    TrendSeasonal,
    /// History too short; flat band around the latest known level.
    InsufficientHistory,
    /// Seasonal table applied to current stock, no history consulted.
    SeasonalBaseline,
}

/// Lower/upper bound pair around a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Fixed ±15% band, not derived from variance.
    pub fn around(prediction: f64) -> Self {
        Self {
            lower: round_to(prediction * (1.0 - CONFIDENCE_BAND), 2),
            upper: round_to(prediction * (1.0 + CONFIDENCE_BAND), 2),
        }
    }
}

/// A multi-period demand forecast. Owned by whoever requested it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predictions: Vec<f64>,
    /// `YYYY-MM` label per prediction.
    pub dates: Vec<String>,
    pub confidence_intervals: Vec<ConfidenceInterval>,
    pub trend: TrendDirection,
    pub growth_rate: f64,
    pub has_seasonality: bool,
    pub peak_month: String,
    /// Illustrative accuracy score in `[0, 100]`.
    pub accuracy: f64,
    /// Illustrative confidence in `[0, 1]`.
    pub confidence: f64,
    pub method: ForecastMethod,
}

impl Forecast {
    /// Sum of the first `n` predictions.
    pub fn demand_over(&self, n: usize) -> f64 {
        self.predictions.iter().take(n).sum()
    }

    /// True when produced by one of the fallback paths.
    pub fn is_fallback(&self) -> bool {
        self.method != ForecastMethod::TrendSeasonal
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
