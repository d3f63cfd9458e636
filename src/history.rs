//! Synthetic sales history.
//!
//! Products carry no recorded sales, so the forecaster is fed a generated
//! monthly series per product: current stock as the base level, scaled by the
//! product's trend tag, the standard seasonal factor and ±10% noise. Each
//! series is generated once and reused for the lifetime of the process.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use crate::config::DEFAULT_HISTORY_MONTHS;
use crate::forecast::{SeasonalIndex, round_to};
use crate::model::{DemandSeries, DemandTrend, Product};
use crate::random::RandomSource;

const INCREASING_STEP: f64 = 0.02;
const DECREASING_STEP: f64 = 0.01;
const NOISE_RANGE: (f64, f64) = (0.9, 1.1);

/// Generate `months` monthly points ending the month before `today`.
pub fn synthesize_history<R: RandomSource + ?Sized>(
    product: &Product,
    months: usize,
    today: NaiveDate,
    seasonal_index: &SeasonalIndex,
    rng: &mut R,
) -> DemandSeries {
    let base = product.current_stock as f64;
    let mut series = DemandSeries::new();

    for i in 0..months {
        let back = u32::try_from(months - i).unwrap_or(u32::MAX);
        let date = today.checked_sub_months(Months::new(back)).unwrap_or(today);

        let trend_factor = match product.demand_trend {
            DemandTrend::Increasing => 1.0 + i as f64 * INCREASING_STEP,
            DemandTrend::Decreasing => 1.0 - i as f64 * DECREASING_STEP,
            DemandTrend::Stable | DemandTrend::Seasonal => 1.0,
        };
        let noise = rng.uniform(NOISE_RANGE.0, NOISE_RANGE.1);
        let demand = base * trend_factor * seasonal_index.factor(date.month()) * noise;

        series.push(date.format("%Y-%m").to_string(), round_to(demand, 2));
    }

    series
}

/// Per-product cache of generated histories.
#[derive(Debug)]
pub struct SalesHistory {
    months: usize,
    seasonal_index: SeasonalIndex,
    series: Mutex<HashMap<String, DemandSeries>>,
}

impl Default for SalesHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_MONTHS)
    }
}

impl SalesHistory {
    pub fn new(months: usize) -> Self {
        Self {
            months,
            seasonal_index: SeasonalIndex::default(),
            series: Mutex::new(HashMap::new()),
        }
    }

    /// The cached history for `product`, generating it on first use.
    ///
    /// Later stock changes do not regenerate the series.
    pub fn history_for<R: RandomSource + ?Sized>(
        &self,
        product: &Product,
        today: NaiveDate,
        rng: &mut R,
    ) -> DemandSeries {
        let mut cache = self.series.lock().unwrap_or_else(|e| e.into_inner());

        cache
            .entry(product.id.clone())
            .or_insert_with(|| {
                debug!(product_id = %product.id, months = self.months, "Generating sales history");
                synthesize_history(product, self.months, today, &self.seasonal_index, rng)
            })
            .clone()
    }

    /// Drop the cached history of a product.
    pub fn forget(&self, product_id: &str) -> bool {
        self.series
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(product_id)
            .is_some()
    }

    pub fn cached_products(&self) -> usize {
        self.series.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SequenceRandom, ThreadRandom};

    fn product(trend: DemandTrend) -> Product {
        Product {
            id: "PROD-001".to_string(),
            name: "Electronics Components".to_string(),
            category: "Electronics".to_string(),
            sku: "ELEC-001-2025".to_string(),
            current_stock: 1000,
            reorder_point: 500,
            safety_stock: 200,
            max_stock: 2000,
            unit_cost: 25.50,
            unit_price: 45.99,
            supplier: "Global Electronics Ltd".to_string(),
            lead_time_days: 5,
            demand_trend: trend,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn test_labels_and_length() {
        let series = synthesize_history(
            &product(DemandTrend::Stable),
            24,
            today(),
            &SeasonalIndex::default(),
            &mut ThreadRandom,
        );

        assert_eq!(series.len(), 24);
        assert_eq!(series.points()[0].period, "2023-03");
        assert_eq!(series.points()[23].period, "2025-02");
    }

    #[test]
    fn test_noise_free_values() {
        // 0.5 maps the noise factor to exactly 1.0
        let mut rng = SequenceRandom::constant(0.5);
        let series = synthesize_history(
            &product(DemandTrend::Increasing),
            3,
            today(),
            &SeasonalIndex::default(),
            &mut rng,
        );

        // Dec 0.85, Jan 0.85, Feb 0.90
        assert_eq!(series.values(), vec![850.0, 867.0, 936.0]);
    }

    #[test]
    fn test_decreasing_trend_never_negative() {
        let mut rng = SequenceRandom::constant(0.5);
        let series = synthesize_history(
            &product(DemandTrend::Decreasing),
            120,
            today(),
            &SeasonalIndex::default(),
            &mut rng,
        );
        assert!(series.values().iter().all(|v| *v >= 0.0));
        assert_eq!(series.last_value(), Some(0.0));
    }

    #[test]
    fn test_noise_bounds() {
        let series = synthesize_history(
            &product(DemandTrend::Stable),
            24,
            today(),
            &SeasonalIndex::new([1.0; 12]),
            &mut ThreadRandom,
        );
        assert!(series.values().iter().all(|v| (900.0..=1100.0).contains(v)));
    }

    #[test]
    fn test_cache_generates_once() {
        let history = SalesHistory::new(12);
        let mut p = product(DemandTrend::Stable);

        let first = history.history_for(&p, today(), &mut ThreadRandom);
        p.current_stock = 5;
        let second = history.history_for(&p, today(), &mut ThreadRandom);

        assert_eq!(first, second);
        assert_eq!(history.cached_products(), 1);

        assert!(history.forget("PROD-001"));
        assert!(!history.forget("PROD-001"));
        assert_eq!(history.cached_products(), 0);
    }
}
