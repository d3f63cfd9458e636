//! Alert generation.
//!
//! Each call to [`generate_alerts`] is a stateless scan over an inventory
//! snapshot. Six independent checks contribute alerts:
//!
//! | Check             | Type                                   | Severity          | Priority |
//! |-------------------|----------------------------------------|-------------------|----------|
//! | Stock level       | `stockout_risk` / `reorder_required`   | critical / warning| 1 / 2    |
//! | Overstock         | `overstock`                            | info              | 3        |
//! | Demand spike      | `demand_spike` (simulated)             | warning           | 2        |
//! | Supplier delay    | `supplier_delay` (simulated)           | warning           | 2        |
//! | Weather           | `weather_impact` (simulated)           | warning           | 2        |
//! | Location capacity | `location_capacity`                    | warning           | 2        |
//!
//! The simulated checks fire on a random draw and are not derived from any
//! forecast. Merging into a persistent history is the caller's job, see
//! [`crate::storage::AlertHistory`].

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::debug;

use crate::forecast::round_to;
use crate::model::{Alert, AlertType, InventorySnapshot, Location, Product, Severity};
use crate::random::RandomSource;
use crate::stock::{StockState, classify_stock_state};

/// A unit draw above this raises a demand spike alert.
pub const DEMAND_SPIKE_TRIGGER: f64 = 0.7;

/// A unit draw above this raises a supplier delay alert.
pub const SUPPLIER_DELAY_TRIGGER: f64 = 0.8;

/// A unit draw above this raises a weather alert.
pub const WEATHER_TRIGGER: f64 = 0.75;

/// Utilization percentage above which a location is flagged.
pub const CAPACITY_WARNING_PCT: f64 = 90.0;

const WEATHER_CONDITIONS: [&str; 4] = ["Heavy rainfall", "Snowstorm", "Tropical storm", "Severe winds"];
const IMPACT_AREAS: [&str; 3] = ["Distribution Center East", "Warehouse North", "Supplier Route"];

/// Run every check against `snapshot` and return the alerts ordered by
/// severity (critical first). Alerts of equal severity keep the order in which
/// the checks produced them.
pub fn generate_alerts<R: RandomSource + ?Sized>(
    snapshot: &InventorySnapshot,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    alerts.extend(check_stock_levels(snapshot.low_stock_products(), now));
    alerts.extend(check_overstock(snapshot.overstock_products(), now));
    alerts.extend(check_demand_spike(&snapshot.products, now, rng));
    alerts.extend(check_supplier_delay(&snapshot.products, now, rng));
    alerts.extend(check_weather_impact(now, rng));
    alerts.extend(check_location_capacity(&snapshot.locations, now));

    alerts.sort_by_key(|alert| alert.severity.rank());

    debug!(
        alert_count = alerts.len(),
        products = snapshot.products.len(),
        locations = snapshot.locations.len(),
        "Alerts generated"
    );

    alerts
}

/// Critical and low stock.
pub fn check_stock_levels<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    products
        .into_iter()
        .filter_map(|product| {
            let state = classify_stock_state(product);
            let (alert_type, severity, priority) = match state {
                StockState::Critical => (AlertType::StockoutRisk, Severity::Critical, 1),
                StockState::Low => (AlertType::ReorderRequired, Severity::Warning, 2),
                _ => return None,
            };
            let (message, action) = stock_alert_text(product, state);

            Some(
                Alert::new(
                    alert_type,
                    severity,
                    &product.id,
                    &product.name,
                    &message,
                    &action,
                    priority,
                    now,
                )
                .with_product(product)
                .with_metadata("current_stock", product.current_stock)
                .with_metadata("reorder_point", product.reorder_point)
                .with_metadata("safety_stock", product.safety_stock),
            )
        })
        .collect()
}

/// Stock above the configured maximum.
pub fn check_overstock<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    products
        .into_iter()
        .filter(|product| classify_stock_state(product) == StockState::Overstock)
        .map(|product| {
            let (message, action) = stock_alert_text(product, StockState::Overstock);
            let excess = product.current_stock - product.max_stock;

            Alert::new(
                AlertType::Overstock,
                Severity::Info,
                &product.id,
                &product.name,
                &message,
                &action,
                3,
                now,
            )
            .with_product(product)
            .with_metadata("current_stock", product.current_stock)
            .with_metadata("max_stock", product.max_stock)
            .with_metadata("excess", excess)
            .with_metadata("transfer_quantity", excess / 2)
        })
        .collect()
}

/// Simulated demand spike on a random product.
pub fn check_demand_spike<R: RandomSource + ?Sized>(
    products: &[Product],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<Alert> {
    if products.is_empty() || rng.unit() <= DEMAND_SPIKE_TRIGGER {
        return None;
    }

    let product = &products[rng.index(products.len())];
    let spike_percent = rng.int_inclusive(20, 50);
    let predicted = (product.current_stock as f64 * (1.0 + f64::from(spike_percent) / 100.0)) as i64;

    Some(
        Alert::new(
            AlertType::DemandSpike,
            Severity::Warning,
            &product.id,
            &product.name,
            &format!("Demand spike detected: {}% increase over normal levels", spike_percent),
            &format!(
                "Increase stock allocation by {}% and expedite next shipment",
                spike_percent
            ),
            2,
            now,
        )
        .with_product(product)
        .with_location("Multiple Locations")
        .with_metadata("spike_percentage", spike_percent)
        .with_metadata("current_demand", product.current_stock)
        .with_metadata("predicted_demand", predicted),
    )
}

/// Simulated supplier delay on a random product.
pub fn check_supplier_delay<R: RandomSource + ?Sized>(
    products: &[Product],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<Alert> {
    if products.is_empty() || rng.unit() <= SUPPLIER_DELAY_TRIGGER {
        return None;
    }

    let product = &products[rng.index(products.len())];
    let delay_days = rng.int_inclusive(1, 5);

    Some(
        Alert::new(
            AlertType::SupplierDelay,
            Severity::Warning,
            &product.id,
            &product.name,
            &format!(
                "Supplier '{}' reporting {}-day delay",
                product.supplier, delay_days
            ),
            "1) Contact alternative suppliers, 2) Inform customers of potential delays, \
             3) Adjust safety stock levels",
            2,
            now,
        )
        .with_product(product)
        .with_location(&product.supplier)
        .with_metadata("supplier", product.supplier.as_str())
        .with_metadata("delay_days", delay_days)
        .with_metadata("original_lead_time", product.lead_time_days)
        .with_metadata("new_lead_time", product.lead_time_days.saturating_add(delay_days)),
    )
}

/// Simulated weather event over two of the operational areas.
pub fn check_weather_impact<R: RandomSource + ?Sized>(
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<Alert> {
    if rng.unit() <= WEATHER_TRIGGER {
        return None;
    }

    let condition = WEATHER_CONDITIONS[rng.index(WEATHER_CONDITIONS.len())];
    let areas: Vec<&str> = rng
        .sample_indices(IMPACT_AREAS.len(), 2)
        .into_iter()
        .map(|i| IMPACT_AREAS[i])
        .collect();
    let duration_days = rng.int_inclusive(2, 4);
    let delay_risk = rng.uniform(0.3, 0.7);

    Some(
        Alert::new(
            AlertType::WeatherImpact,
            Severity::Warning,
            "MULTI",
            "Multiple Products",
            &format!(
                "{} predicted in operational areas - potential delivery delays",
                condition
            ),
            "1) Increase safety stock by 15-20%, 2) Activate backup shipping routes, \
             3) Prepare contingency plans",
            2,
            now,
        )
        .with_location(&areas.join(", "))
        .with_metadata("weather_condition", condition)
        .with_metadata("affected_areas", json!(areas))
        .with_metadata("duration_days", duration_days)
        .with_metadata("delay_risk", round_to(delay_risk, 2)),
    )
}

/// Locations filled beyond [`CAPACITY_WARNING_PCT`].
pub fn check_location_capacity(locations: &[Location], now: DateTime<Utc>) -> Vec<Alert> {
    locations
        .iter()
        .filter_map(|location| {
            let utilization = location.utilization();
            if utilization <= CAPACITY_WARNING_PCT {
                return None;
            }

            Some(
                Alert::new(
                    AlertType::LocationCapacity,
                    Severity::Warning,
                    &location.id,
                    "Location Capacity",
                    &format!("Capacity at {:.1}% - approaching maximum", utilization),
                    "1) Transfer stock to alternative locations, 2) Expedite shipments, \
                     3) Review storage optimization",
                    2,
                    now,
                )
                .with_location(&location.name)
                .with_metadata("location_id", location.id.as_str())
                .with_metadata("current_utilization", round_to(utilization, 1))
                .with_metadata("current_stock", location.current_stock)
                .with_metadata("capacity", location.capacity)
                .with_metadata("available_space", location.capacity - location.current_stock),
            )
        })
        .collect()
}

/// Alerts of one severity, order preserved.
pub fn filter_by_severity(alerts: &[Alert], severity: Severity) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|a| a.severity == severity)
        .cloned()
        .collect()
}

/// Alerts raised for one product, order preserved.
pub fn filter_by_product(alerts: &[Alert], product_id: &str) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|a| a.product_id.as_deref() == Some(product_id))
        .cloned()
        .collect()
}

/// Human-readable message and recommended action for a stock state alert.
fn stock_alert_text(product: &Product, state: StockState) -> (String, String) {
    match state {
        StockState::Critical => (
            format!(
                "CRITICAL: Stock at {} units (Safety stock: {})",
                product.current_stock, product.safety_stock
            ),
            format!(
                "IMMEDIATE ACTION REQUIRED: Reorder {} units within 24 hours",
                product.reorder_point * 2
            ),
        ),
        StockState::Low => (
            format!(
                "Stock below reorder point: {} units (Reorder at: {})",
                product.current_stock, product.reorder_point
            ),
            format!(
                "Place order for {} units. Lead time: {} days",
                product.reorder_point, product.lead_time_days
            ),
        ),
        StockState::Overstock => {
            let excess = product.current_stock - product.max_stock;
            (
                format!(
                    "Overstock detected: {} units ({} above optimal level)",
                    product.current_stock, excess
                ),
                format!(
                    "Consider: 1) Promotional campaign to increase sales, \
                     2) Transfer {} units to high-demand location, 3) Review reorder quantities",
                    excess / 2
                ),
            )
        }
        _ => (
            format!("Product '{}' stock status: {:?}", product.id, state),
            String::new(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DemandTrend, LocationKind};
    use crate::random::{SequenceRandom, ThreadRandom};

    fn product(id: &str, current_stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            category: "Electronics".to_string(),
            sku: format!("SKU-{id}"),
            current_stock,
            reorder_point: 500,
            safety_stock: 200,
            max_stock: 2000,
            unit_cost: 25.50,
            unit_price: 45.99,
            supplier: "Global Electronics Ltd".to_string(),
            lead_time_days: 5,
            demand_trend: DemandTrend::Stable,
        }
    }

    fn location(id: &str, capacity: i64, current_stock: i64) -> Location {
        Location {
            id: id.to_string(),
            name: format!("Site {id}"),
            kind: LocationKind::Warehouse,
            capacity,
            current_stock,
            address: "Somewhere".to_string(),
            manager: "Someone".to_string(),
        }
    }

    fn snapshot() -> InventorySnapshot {
        InventorySnapshot {
            products: vec![
                product("P-NORMAL", 1000),
                product("P-OVER", 2600),
                product("P-LOW", 400),
                product("P-CRIT", 150),
            ],
            locations: vec![location("WH-1", 10000, 9500), location("WH-2", 10000, 5000)],
        }
    }

    /// A source whose draws never trigger the simulated checks.
    fn quiet() -> SequenceRandom {
        SequenceRandom::constant(0.0)
    }

    #[test]
    fn test_critical_stock_yields_single_stockout_alert() {
        let now = Utc::now();
        for _ in 0..20 {
            let alerts = generate_alerts(&snapshot(), now, &mut ThreadRandom);
            let stockouts: Vec<&Alert> = alerts
                .iter()
                .filter(|a| {
                    a.alert_type == AlertType::StockoutRisk
                        && a.product_id.as_deref() == Some("P-CRIT")
                })
                .collect();

            assert_eq!(stockouts.len(), 1);
            assert_eq!(stockouts[0].severity, Severity::Critical);
            assert_eq!(stockouts[0].priority, 1);
        }
    }

    #[test]
    fn test_deterministic_checks() {
        let alerts = generate_alerts(&snapshot(), Utc::now(), &mut quiet());

        let kinds: Vec<(AlertType, Option<&str>)> = alerts
            .iter()
            .map(|a| (a.alert_type, a.product_id.as_deref()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (AlertType::StockoutRisk, Some("P-CRIT")),
                (AlertType::ReorderRequired, Some("P-LOW")),
                (AlertType::LocationCapacity, None),
                (AlertType::Overstock, Some("P-OVER")),
            ]
        );

        let overstock = &alerts[3];
        assert_eq!(overstock.priority, 3);
        assert_eq!(overstock.metadata["excess"], 600);
        assert!(overstock.recommended_action.contains("Transfer 300 units"));

        let capacity = &alerts[2];
        assert_eq!(capacity.location, "Site WH-1");
        assert_eq!(capacity.metadata["current_utilization"], 95.0);
        assert!(capacity.message.contains("95.0%"));
    }

    #[test]
    fn test_severity_ordering_is_stable() {
        let alerts = generate_alerts(&snapshot(), Utc::now(), &mut ThreadRandom);
        let ranks: Vec<u8> = alerts.iter().map(|a| a.severity.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_simulated_checks_fire_on_high_draws() {
        let now = Utc::now();
        let products = vec![product("P-A", 1000), product("P-B", 1000)];

        // trigger, product index (0.9 -> second), spike (0.0 -> 20%)
        let mut rng = SequenceRandom::new(vec![0.95, 0.9, 0.0]);
        let spike = check_demand_spike(&products, now, &mut rng).unwrap();
        assert_eq!(spike.product_id.as_deref(), Some("P-B"));
        assert_eq!(spike.metadata["spike_percentage"], 20);
        assert_eq!(spike.metadata["predicted_demand"], 1200);
        assert_eq!(spike.location, "Multiple Locations");

        // trigger, product index, delay (0.999 -> 5 days)
        let mut rng = SequenceRandom::new(vec![0.85, 0.0, 0.999]);
        let delay = check_supplier_delay(&products, now, &mut rng).unwrap();
        assert_eq!(delay.metadata["delay_days"], 5);
        assert_eq!(delay.metadata["new_lead_time"], 10);
        assert!(delay.message.contains("5-day delay"));

        let mut rng = SequenceRandom::new(vec![0.8, 0.0, 0.0, 0.0, 0.0, 0.5]);
        let weather = check_weather_impact(now, &mut rng).unwrap();
        assert_eq!(weather.metadata["weather_condition"], "Heavy rainfall");
        assert_eq!(weather.metadata["affected_areas"].as_array().unwrap().len(), 2);
        assert!(weather.id.starts_with("ALERT-MULTI-WEATHER_IMPACT-"));
    }

    #[test]
    fn test_supplier_delay_caps_lead_time() {
        let mut slow = product("P-SLOW", 1000);
        slow.lead_time_days = u32::MAX;

        let mut rng = SequenceRandom::new(vec![0.9, 0.0, 0.999]);
        let delay = check_supplier_delay(&[slow], Utc::now(), &mut rng).unwrap();
        assert_eq!(delay.metadata["delay_days"], 5);
        assert_eq!(delay.metadata["new_lead_time"], u32::MAX);
    }

    #[test]
    fn test_simulated_checks_respect_thresholds() {
        let now = Utc::now();
        let products = vec![product("P-A", 1000)];

        assert!(check_demand_spike(&products, now, &mut SequenceRandom::constant(0.7)).is_none());
        assert!(check_supplier_delay(&products, now, &mut SequenceRandom::constant(0.8)).is_none());
        assert!(check_weather_impact(now, &mut SequenceRandom::constant(0.75)).is_none());

        // Nothing to pick from
        assert!(check_demand_spike(&[], now, &mut SequenceRandom::constant(0.99)).is_none());
        assert!(check_supplier_delay(&[], now, &mut SequenceRandom::constant(0.99)).is_none());
    }

    #[test]
    fn test_capacity_boundary() {
        let now = Utc::now();
        let locations = vec![
            location("AT-90", 1000, 900),
            location("OVER-90", 1000, 901),
            location("EMPTY", 0, 50),
        ];
        let alerts = check_location_capacity(&locations, now);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metadata["location_id"], "OVER-90");
        assert_eq!(alerts[0].metadata["available_space"], 99);
    }

    #[test]
    fn test_repeat_scan_matches_aside_from_identity() {
        let first = generate_alerts(&snapshot(), Utc::now(), &mut quiet());
        let later = Utc::now() + chrono::Duration::seconds(5);
        let second = generate_alerts(&snapshot(), later, &mut quiet());

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.alert_type, b.alert_type);
            assert_eq!(a.message, b.message);
            assert_eq!(a.metadata, b.metadata);
        }
    }

    #[test]
    fn test_filters() {
        let alerts = generate_alerts(&snapshot(), Utc::now(), &mut quiet());

        let critical = filter_by_severity(&alerts, Severity::Critical);
        assert_eq!(critical.len(), 1);

        let low = filter_by_product(&alerts, "P-LOW");
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].alert_type, AlertType::ReorderRequired);

        assert!(filter_by_product(&alerts, "P-NORMAL").is_empty());
    }

    #[test]
    fn test_stock_alert_text() {
        let (message, action) = stock_alert_text(&product("P-CRIT", 150), StockState::Critical);
        assert!(message.contains("CRITICAL"));
        assert!(message.contains("150"));
        assert!(action.contains("Reorder 1000 units"));

        let (message, action) = stock_alert_text(&product("P-LOW", 400), StockState::Low);
        assert!(message.contains("Reorder at: 500"));
        assert!(action.contains("Lead time: 5 days"));
    }
}
