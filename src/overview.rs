//! Inventory overview KPIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::forecast::round_to;
use crate::model::{Alert, InventorySnapshot, Location, Severity};

/// Number of alerts echoed in the overview.
pub const RECENT_ALERT_COUNT: usize = 5;

/// Utilization band (percent, inclusive) considered healthy.
pub const OPTIMAL_UTILIZATION: (f64, f64) = (60.0, 85.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationStatus {
    Optimal,
    Warning,
}

impl UtilizationStatus {
    pub fn from_utilization(utilization: f64) -> Self {
        if (OPTIMAL_UTILIZATION.0..=OPTIMAL_UTILIZATION.1).contains(&utilization) {
            UtilizationStatus::Optimal
        } else {
            UtilizationStatus::Warning
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub location: String,
    pub location_id: String,
    pub capacity: i64,
    pub current_stock: i64,
    /// Percent, 1 decimal.
    pub utilization: f64,
    pub status: UtilizationStatus,
}

impl LocationSummary {
    pub fn from_location(location: &Location) -> Self {
        let utilization = location.utilization();
        Self {
            location: location.name.clone(),
            location_id: location.id.clone(),
            capacity: location.capacity,
            current_stock: location.current_stock,
            utilization: round_to(utilization, 1),
            status: UtilizationStatus::from_utilization(utilization),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_products: usize,
    pub total_locations: usize,
    pub total_inventory_value: f64,
    pub critical_alerts: usize,
    /// Share of products at or below their reorder point, percent.
    pub stockout_rate: f64,
    pub avg_lead_time: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub kpis: Kpis,
    pub recent_alerts: Vec<Alert>,
    pub inventory_summary: Vec<LocationSummary>,
    pub timestamp: DateTime<Utc>,
}

/// Summarize `snapshot` together with the alerts of the current scan.
pub fn build_overview(snapshot: &InventorySnapshot, alerts: &[Alert], now: DateTime<Utc>) -> Overview {
    let products = &snapshot.products;

    let low_stock = snapshot.low_stock_products().count();
    let stockout_rate = if products.is_empty() {
        0.0
    } else {
        round_to(low_stock as f64 / products.len() as f64 * 100.0, 1)
    };
    let avg_lead_time = if products.is_empty() {
        0.0
    } else {
        let total: f64 = products.iter().map(|p| f64::from(p.lead_time_days)).sum();
        round_to(total / products.len() as f64, 1)
    };

    let kpis = Kpis {
        total_products: products.len(),
        total_locations: snapshot.locations.len(),
        total_inventory_value: round_to(snapshot.inventory_value(), 2),
        critical_alerts: alerts
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .count(),
        stockout_rate,
        avg_lead_time,
    };

    Overview {
        kpis,
        recent_alerts: alerts.iter().take(RECENT_ALERT_COUNT).cloned().collect(),
        inventory_summary: snapshot
            .locations
            .iter()
            .map(LocationSummary::from_location)
            .collect(),
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::generate_alerts;
    use crate::random::SequenceRandom;
    use crate::storage::Inventory;

    #[test]
    fn test_demo_overview() {
        let snapshot = Inventory::with_demo_catalog().snapshot();
        let now = Utc::now();
        let alerts = generate_alerts(&snapshot, now, &mut SequenceRandom::constant(0.0));
        let overview = build_overview(&snapshot, &alerts, now);

        assert_eq!(overview.kpis.total_products, 5);
        assert_eq!(overview.kpis.total_locations, 4);
        assert_eq!(overview.kpis.critical_alerts, 0);
        assert_eq!(overview.kpis.stockout_rate, 0.0);
        assert_eq!(overview.kpis.avg_lead_time, 5.8);
        assert_eq!(overview.kpis.total_inventory_value, 160_580.5);

        let north = &overview.inventory_summary[0];
        assert_eq!(north.utilization, 75.0);
        assert_eq!(north.status, UtilizationStatus::Optimal);

        // DC-002 at 81.7%, DC-001 at 82%
        assert!(overview
            .inventory_summary
            .iter()
            .all(|l| l.status == UtilizationStatus::Optimal));
    }

    #[test]
    fn test_overview_after_stock_drop() {
        let inventory = Inventory::with_demo_catalog();
        inventory.adjust_stock("PROD-004", -300, "Damaged").unwrap();
        let snapshot = inventory.snapshot();

        let overview = build_overview(&snapshot, &[], Utc::now());
        assert_eq!(overview.kpis.stockout_rate, 20.0);
        assert_eq!(overview.kpis.total_inventory_value, 137_030.5);
    }

    #[test]
    fn test_empty_catalog() {
        let overview = build_overview(&InventorySnapshot::default(), &[], Utc::now());
        assert_eq!(overview.kpis.stockout_rate, 0.0);
        assert_eq!(overview.kpis.avg_lead_time, 0.0);
        assert!(overview.recent_alerts.is_empty());
    }

    #[test]
    fn test_utilization_band() {
        assert_eq!(UtilizationStatus::from_utilization(60.0), UtilizationStatus::Optimal);
        assert_eq!(UtilizationStatus::from_utilization(85.0), UtilizationStatus::Optimal);
        assert_eq!(UtilizationStatus::from_utilization(59.9), UtilizationStatus::Warning);
        assert_eq!(UtilizationStatus::from_utilization(92.0), UtilizationStatus::Warning);
    }
}
