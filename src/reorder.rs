//! Reorder planning.
//!
//! Turns a short-horizon forecast and a product's stock figures into an
//! economic-order-quantity recommendation.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::forecast::{Forecast, ForecastEngine, TrendDirection, round_to};
use crate::model::Product;
use crate::random::RandomSource;

/// Forecast periods summed into the expected demand.
pub const PLANNING_HORIZON: usize = 3;

/// Multiplier from the horizon sum to a yearly figure. Applied regardless of
/// the period length of the forecast.
pub const ANNUALIZATION_FACTOR: f64 = 4.0;

/// Fixed cost per order.
pub const ORDERING_COST: f64 = 100.0;

/// Yearly holding cost as a share of unit cost.
pub const HOLDING_COST_RATE: f64 = 0.2;

/// Days of demand the horizon sum is spread over for the lead-time check.
const DEMAND_DAYS: f64 = 30.0;

const INCREASING_TREND_SCALE: f64 = 1.2;
const DECREASING_TREND_SCALE: f64 = 0.8;

/// Priority score is binary: reorder or not.
const REORDER_PRIORITY: u32 = 100;
const HOLD_PRIORITY: u32 = 50;

/// Bounds of the illustrative savings estimate.
const SAVINGS_RANGE: (f64, f64) = (5000.0, 15000.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    pub product_id: String,
    pub product_name: String,
    pub current_stock: i64,
    /// Sum of the first three predictions, rounded.
    pub forecast_demand: f64,
    /// Trend-adjusted EOQ, rounded to whole units.
    pub recommended_quantity: u64,
    pub should_reorder: bool,
    pub priority_score: u32,
    /// EOQ at unit cost.
    pub cost: f64,
    /// Synthetic estimate, not derived from the EOQ.
    pub estimated_savings: f64,
    pub reorder_date: NaiveDate,
}

/// Economic order quantity before trend adjustment.
pub fn economic_order_quantity(annual_demand: f64, unit_cost: f64) -> f64 {
    let holding_cost = unit_cost * HOLDING_COST_RATE;
    if holding_cost <= 0.0 || annual_demand <= 0.0 {
        return 0.0;
    }
    (2.0 * annual_demand * ORDERING_COST / holding_cost).sqrt()
}

/// Build a reorder recommendation for `product` from `forecast`.
pub fn plan_reorder<R: RandomSource + ?Sized>(
    product: &Product,
    forecast: &Forecast,
    today: NaiveDate,
    rng: &mut R,
) -> ReorderRecommendation {
    let expected_demand = forecast.demand_over(PLANNING_HORIZON);
    let annual_demand = expected_demand * ANNUALIZATION_FACTOR;

    let mut eoq = economic_order_quantity(annual_demand, product.unit_cost);
    match forecast.trend {
        TrendDirection::Increasing => eoq *= INCREASING_TREND_SCALE,
        TrendDirection::Decreasing => eoq *= DECREASING_TREND_SCALE,
        TrendDirection::Stable => {}
    }

    let lead_time_demand = expected_demand / DEMAND_DAYS * f64::from(product.lead_time_days);
    let should_reorder = product.current_stock as f64 <= product.reorder_point as f64 + lead_time_demand;

    debug!(
        product_id = %product.id,
        expected_demand,
        eoq,
        should_reorder,
        "Reorder planned"
    );

    ReorderRecommendation {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        current_stock: product.current_stock,
        forecast_demand: expected_demand.round(),
        recommended_quantity: eoq.round() as u64,
        should_reorder,
        priority_score: if should_reorder {
            REORDER_PRIORITY
        } else {
            HOLD_PRIORITY
        },
        cost: round_to(eoq * product.unit_cost, 2),
        estimated_savings: round_to(rng.uniform(SAVINGS_RANGE.0, SAVINGS_RANGE.1), 2),
        reorder_date: today
            .checked_add_days(Days::new(u64::from(product.lead_time_days)))
            .unwrap_or(NaiveDate::MAX),
    }
}

/// Totals over a replenishment plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentSummary {
    pub total_items: usize,
    pub total_investment: f64,
    pub estimated_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentPlan {
    pub recommendations: Vec<ReorderRecommendation>,
    pub summary: ReplenishmentSummary,
}

/// Catalog-wide scan: a three-period [`ForecastEngine::forecast_simple`] per
/// product, keeping only products that should be reordered, highest priority
/// first.
pub fn plan_replenishment<R: RandomSource + ?Sized>(
    engine: &ForecastEngine,
    products: &[Product],
    today: NaiveDate,
    rng: &mut R,
) -> ReplenishmentPlan {
    let mut recommendations: Vec<ReorderRecommendation> = products
        .iter()
        .filter_map(|product| {
            let forecast = engine.forecast_simple(product, PLANNING_HORIZON, today, rng);
            let recommendation = plan_reorder(product, &forecast, today, rng);
            recommendation.should_reorder.then_some(recommendation)
        })
        .collect();

    recommendations.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));

    let summary = ReplenishmentSummary {
        total_items: recommendations.len(),
        total_investment: round_to(recommendations.iter().map(|r| r.cost).sum(), 2),
        estimated_savings: round_to(recommendations.iter().map(|r| r.estimated_savings).sum(), 2),
    };

    ReplenishmentPlan {
        recommendations,
        summary,
    }
}
