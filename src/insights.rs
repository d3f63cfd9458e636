//! Plain-language insights derived from a forecast.

use serde::{Deserialize, Serialize};

use crate::forecast::{Forecast, TrendDirection};
use crate::model::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    DemandSurge,
    DemandDrop,
    Seasonality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightLevel {
    High,
    Medium,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub severity: InsightLevel,
    pub message: String,
    pub recommendation: String,
}

/// Summarize the trend and seasonality of `forecast` for `product`.
pub fn forecast_insights(forecast: &Forecast, product: &Product) -> Vec<Insight> {
    let mut insights = Vec::new();

    match forecast.trend {
        TrendDirection::Increasing => {
            let surge_pct = forecast.growth_rate * 100.0;
            let extra_units = (product.current_stock as f64 * forecast.growth_rate) as i64;
            insights.push(Insight {
                kind: InsightKind::DemandSurge,
                severity: InsightLevel::High,
                message: format!(
                    "High demand predicted for {}. Expected {:.0}% increase.",
                    product.name, surge_pct
                ),
                recommendation: format!("Recommend increasing stock by {} units.", extra_units),
            });
        }
        TrendDirection::Decreasing => {
            insights.push(Insight {
                kind: InsightKind::DemandDrop,
                severity: InsightLevel::Medium,
                message: format!("Seasonal dip predicted for {}.", product.name),
                recommendation: "Consider reducing reorder quantities to avoid overstock."
                    .to_string(),
            });
        }
        TrendDirection::Stable => {}
    }

    if forecast.has_seasonality {
        insights.push(Insight {
            kind: InsightKind::Seasonality,
            severity: InsightLevel::Info,
            message: format!(
                "Seasonal pattern detected. Peak demand in {}.",
                forecast.peak_month
            ),
            recommendation: format!(
                "Plan inventory buildup 2-3 weeks before {}.",
                forecast.peak_month
            ),
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastMethod;
    use crate::model::DemandTrend;

    fn product() -> Product {
        Product {
            id: "PROD-005".to_string(),
            name: "Consumer Goods".to_string(),
            category: "Consumer".to_string(),
            sku: "CONS-005-2025".to_string(),
            current_stock: 3200,
            reorder_point: 1000,
            safety_stock: 500,
            max_stock: 5000,
            unit_cost: 8.99,
            unit_price: 17.99,
            supplier: "Consumer Products Ltd".to_string(),
            lead_time_days: 4,
            demand_trend: DemandTrend::Increasing,
        }
    }

    fn forecast(trend: TrendDirection, growth_rate: f64, has_seasonality: bool) -> Forecast {
        Forecast {
            predictions: vec![],
            dates: vec![],
            confidence_intervals: vec![],
            trend,
            growth_rate,
            has_seasonality,
            peak_month: "July".to_string(),
            accuracy: 80.0,
            confidence: 0.95,
            method: ForecastMethod::TrendSeasonal,
        }
    }

    #[test]
    fn test_surge_insight() {
        let insights = forecast_insights(&forecast(TrendDirection::Increasing, 0.25, false), &product());

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::DemandSurge);
        assert!(insights[0].message.contains("25% increase"));
        assert!(insights[0].recommendation.contains("800 units"));
    }

    #[test]
    fn test_drop_and_seasonality() {
        let insights = forecast_insights(&forecast(TrendDirection::Decreasing, -0.1, true), &product());

        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightKind::DemandDrop);
        assert_eq!(insights[1].kind, InsightKind::Seasonality);
        assert!(insights[1].message.contains("July"));
    }

    #[test]
    fn test_stable_without_seasonality_is_quiet() {
        assert!(forecast_insights(&forecast(TrendDirection::Stable, 0.0, false), &product()).is_empty());
    }
}
