//! In-memory stores for Stockcast.
//!
//! [`Inventory`] holds the product catalog, the storage locations and the
//! stock movement log. [`AlertHistory`] keeps every alert the service has
//! raised so that alerts can be listed and cleared after the scan that
//! produced them. Both are cheap to clone and share one underlying state.
//!
//! Nothing is persisted; a restart starts from the demo catalog (or an empty
//! store) again.

use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{Result, StockcastError};
use crate::model::{
    Alert, AlertStatus, DemandTrend, InventorySnapshot, Location, LocationKind, MovementType,
    NewProduct, Product, StockAdjustment, StockMovement, StockTransfer,
};
use crate::stock::{StockState, classify_stock_state};

/// Default number of entries returned from the movement log.
pub const DEFAULT_MOVEMENT_LIMIT: usize = 50;

#[derive(Debug, Default)]
struct InventoryState {
    products: Vec<Product>,
    locations: Vec<Location>,
    movements: Vec<StockMovement>,
}

impl InventoryState {
    fn product_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    fn has_location(&self, id: &str) -> bool {
        self.locations.iter().any(|l| l.id == id)
    }

    fn next_product_id(&self) -> String {
        let mut n = self.products.len() + 1;
        loop {
            let id = format!("PROD-{n:03}");
            if !self.products.iter().any(|p| p.id == id) {
                return id;
            }
            n += 1;
        }
    }

    fn log_movement(
        &mut self,
        product_id: &str,
        movement_type: MovementType,
        quantity: i64,
        reason: Option<String>,
        route: Option<(&str, &str)>,
    ) -> &StockMovement {
        let movement = StockMovement {
            id: format!("MOV-{:06}", self.movements.len() + 1),
            product_id: product_id.to_string(),
            movement_type,
            quantity,
            timestamp: Utc::now(),
            reason,
            from_location: route.map(|(from, _)| from.to_string()),
            to_location: route.map(|(_, to)| to.to_string()),
        };
        self.movements.push(movement);
        &self.movements[self.movements.len() - 1]
    }
}

/// Product catalog, locations and movement log.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    state: Arc<RwLock<InventoryState>>,
}

impl Inventory {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the given records and an empty movement log.
    pub fn from_parts(products: Vec<Product>, locations: Vec<Location>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InventoryState {
                products,
                locations,
                movements: Vec::new(),
            })),
        }
    }

    /// A store seeded with the demo catalog: five products and four sites.
    pub fn with_demo_catalog() -> Self {
        Self::from_parts(demo_products(), demo_locations())
    }

    fn read(&self) -> RwLockReadGuard<'_, InventoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, InventoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn products(&self) -> Vec<Product> {
        self.read().products.clone()
    }

    pub fn locations(&self) -> Vec<Location> {
        self.read().locations.clone()
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        self.read().products.iter().find(|p| p.id == id).cloned()
    }

    pub fn location(&self, id: &str) -> Option<Location> {
        self.read().locations.iter().find(|l| l.id == id).cloned()
    }

    /// Consistent copy of products and locations for the alert engine.
    pub fn snapshot(&self) -> InventorySnapshot {
        let state = self.read();
        InventorySnapshot {
            products: state.products.clone(),
            locations: state.locations.clone(),
        }
    }

    /// Add a product under the next free `PROD-nnn` id.
    pub fn add_product(&self, new: NewProduct) -> Result<Product> {
        let mut state = self.write();
        let id = state.next_product_id();
        let product = Product::from_new(id, new).inspect_err(|e| {
            warn!(error = %e, "Rejected new product");
        })?;

        state.products.push(product.clone());
        state.log_movement(
            &product.id,
            MovementType::ProductAdded,
            product.current_stock,
            Some("New product added to system".to_string()),
            None,
        );

        info!(product_id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    /// Remove a product. Returns false if it was not in the catalog.
    pub fn remove_product(&self, id: &str) -> bool {
        let mut state = self.write();
        let before = state.products.len();
        state.products.retain(|p| p.id != id);

        if state.products.len() == before {
            warn!(product_id = %id, "Remove requested for unknown product");
            return false;
        }

        state.log_movement(
            id,
            MovementType::ProductRemoved,
            0,
            Some("Product discontinued".to_string()),
            None,
        );
        info!(product_id = %id, "Product removed");
        true
    }

    /// Apply a signed change to a product's stock.
    ///
    /// Fails with `InvalidQuantity` if the result would be negative; the
    /// product is unchanged in that case.
    pub fn adjust_stock(&self, id: &str, adjustment: i64, reason: &str) -> Result<StockAdjustment> {
        let mut state = self.write();
        let product = state
            .product_mut(id)
            .ok_or_else(|| StockcastError::product_not_found(id))?;

        let previous_stock = product.current_stock;
        let Some(new_stock) = previous_stock.checked_add(adjustment) else {
            warn!(product_id = %id, previous_stock, adjustment, "Adjustment overflows");
            return Err(StockcastError::InvalidQuantity(format!(
                "adjustment {adjustment:+} out of range for '{id}'"
            )));
        };
        if new_stock < 0 {
            warn!(product_id = %id, previous_stock, adjustment, "Adjustment rejected");
            return Err(StockcastError::InvalidQuantity(format!(
                "cannot reduce stock of '{id}' below zero ({previous_stock} {adjustment:+})"
            )));
        }
        product.current_stock = new_stock;

        let timestamp = state
            .log_movement(
                id,
                MovementType::Adjustment,
                adjustment,
                Some(reason.to_string()),
                None,
            )
            .timestamp;

        info!(product_id = %id, previous_stock, new_stock, "Stock adjusted");
        Ok(StockAdjustment {
            product_id: id.to_string(),
            previous_stock,
            new_stock,
            adjustment,
            reason: reason.to_string(),
            timestamp,
        })
    }

    /// Record a transfer between two locations.
    ///
    /// Stock is only tracked per product, so totals are unchanged; the
    /// transfer is validated and logged.
    pub fn transfer_stock(
        &self,
        id: &str,
        from_location: &str,
        to_location: &str,
        quantity: i64,
    ) -> Result<StockTransfer> {
        let mut state = self.write();

        let current_stock = state
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.current_stock)
            .ok_or_else(|| StockcastError::product_not_found(id))?;
        if !state.has_location(from_location) {
            return Err(StockcastError::location_not_found(from_location));
        }
        if !state.has_location(to_location) {
            return Err(StockcastError::location_not_found(to_location));
        }
        if quantity <= 0 {
            warn!(product_id = %id, quantity, "Transfer rejected");
            return Err(StockcastError::InvalidQuantity(format!(
                "transfer quantity must be positive, got {quantity}"
            )));
        }
        if quantity > current_stock {
            warn!(product_id = %id, quantity, current_stock, "Transfer rejected");
            return Err(StockcastError::InvalidQuantity(format!(
                "insufficient stock for transfer: {quantity} requested, {current_stock} available"
            )));
        }

        let timestamp = state
            .log_movement(
                id,
                MovementType::Transfer,
                quantity,
                None,
                Some((from_location, to_location)),
            )
            .timestamp;

        info!(product_id = %id, from = %from_location, to = %to_location, quantity, "Stock transferred");
        Ok(StockTransfer {
            product_id: id.to_string(),
            from: from_location.to_string(),
            to: to_location.to_string(),
            quantity,
            timestamp,
        })
    }

    /// Movement log entries, most recent first, optionally for one product.
    pub fn movement_history(&self, product_id: Option<&str>, limit: usize) -> Vec<StockMovement> {
        self.read()
            .movements
            .iter()
            .rev()
            .filter(|m| product_id.is_none_or(|id| m.product_id == id))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Stock state of a product, `Unknown` if it is not in the catalog.
    pub fn stock_state(&self, id: &str) -> StockState {
        self.read()
            .products
            .iter()
            .find(|p| p.id == id)
            .map(classify_stock_state)
            .unwrap_or(StockState::Unknown)
    }
}

/// Every alert raised so far, in the order first seen.
#[derive(Debug, Clone, Default)]
pub struct AlertHistory {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl AlertHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append alerts whose id has not been recorded yet. Returns how many
    /// were added.
    pub fn record(&self, alerts: &[Alert]) -> usize {
        let mut history = self.alerts.lock().unwrap_or_else(|e| e.into_inner());
        let mut added = 0;

        for alert in alerts {
            if history.iter().any(|a| a.id == alert.id) {
                continue;
            }
            history.push(alert.clone());
            added += 1;
        }

        added
    }

    /// Mark an alert cleared. Returns false if no alert has that id.
    pub fn clear(&self, id: &str, now: DateTime<Utc>) -> bool {
        let mut history = self.alerts.lock().unwrap_or_else(|e| e.into_inner());

        match history.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.status = AlertStatus::Cleared;
                alert.cleared_at = Some(now);
                info!(alert_id = %id, "Alert cleared");
                true
            }
            None => false,
        }
    }

    pub fn all(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_product(
    id: &str,
    name: &str,
    category: &str,
    sku: &str,
    stock: (i64, i64, i64, i64),
    cost: (f64, f64),
    supplier: &str,
    lead_time_days: u32,
    demand_trend: DemandTrend,
) -> Product {
    let (current_stock, reorder_point, safety_stock, max_stock) = stock;
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        sku: sku.to_string(),
        current_stock,
        reorder_point,
        safety_stock,
        max_stock,
        unit_cost: cost.0,
        unit_price: cost.1,
        supplier: supplier.to_string(),
        lead_time_days,
        demand_trend,
    }
}

fn demo_products() -> Vec<Product> {
    vec![
        demo_product(
            "PROD-001",
            "Electronics Components",
            "Electronics",
            "ELEC-001-2025",
            (1250, 500, 200, 2000),
            (25.50, 45.99),
            "Global Electronics Ltd",
            5,
            DemandTrend::Increasing,
        ),
        demo_product(
            "PROD-002",
            "Automotive Parts",
            "Automotive",
            "AUTO-002-2025",
            (850, 300, 150, 1500),
            (45.75, 89.99),
            "AutoParts International",
            7,
            DemandTrend::Stable,
        ),
        demo_product(
            "PROD-003",
            "Medical Supplies",
            "Healthcare",
            "MED-003-2025",
            (2100, 800, 400, 3000),
            (12.25, 24.99),
            "MedSupply Corp",
            3,
            DemandTrend::Seasonal,
        ),
        demo_product(
            "PROD-004",
            "Industrial Tools",
            "Industrial",
            "IND-004-2025",
            (450, 200, 100, 800),
            (78.50, 149.99),
            "Tools & Equipment Inc",
            10,
            DemandTrend::Stable,
        ),
        demo_product(
            "PROD-005",
            "Consumer Goods",
            "Consumer",
            "CONS-005-2025",
            (3200, 1000, 500, 5000),
            (8.99, 17.99),
            "Consumer Products Ltd",
            4,
            DemandTrend::Increasing,
        ),
    ]
}

fn demo_location(
    id: &str,
    name: &str,
    kind: LocationKind,
    capacity: i64,
    current_stock: i64,
    address: &str,
    manager: &str,
) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        capacity,
        current_stock,
        address: address.to_string(),
        manager: manager.to_string(),
    }
}

fn demo_locations() -> Vec<Location> {
    vec![
        demo_location(
            "WH-001",
            "Warehouse North",
            LocationKind::Warehouse,
            10000,
            7500,
            "Industrial Area, North Zone",
            "John Smith",
        ),
        demo_location(
            "WH-002",
            "Warehouse South",
            LocationKind::Warehouse,
            8000,
            5200,
            "Port Area, South Zone",
            "Sarah Johnson",
        ),
        demo_location(
            "DC-001",
            "Distribution Center East",
            LocationKind::DistributionCenter,
            15000,
            12300,
            "Highway 101, East Zone",
            "Mike Chen",
        ),
        demo_location(
            "DC-002",
            "Distribution Center West",
            LocationKind::DistributionCenter,
            12000,
            9800,
            "Business Park, West Zone",
            "Emily Davis",
        ),
    ]
}
