//! Data models for Stockcast.
//!
//! Catalog records ([`Product`], [`Location`]), the demand history fed to the
//! forecaster ([`DemandSeries`]), operational [`Alert`]s and the stock movement
//! log. Forecast and reorder outputs live next to the code that produces them
//! in [`crate::forecast`] and [`crate::reorder`].

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StockcastError};
use crate::stock::{StockState, classify_stock_state};

/// One observation in a demand history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    /// Period label, `YYYY-MM` (a full `YYYY-MM-DD` date is also accepted).
    pub period: String,

    /// Observed demand for the period. Never negative.
    pub value: f64,
}

impl DemandPoint {
    /// Calendar month of the period label, if it parses.
    pub fn month(&self) -> Option<NaiveDate> {
        parse_period(&self.period)
    }
}

/// Parse a `YYYY-MM` or `YYYY-MM-DD` label to the first day of its month.
pub fn parse_period(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    let month_part = label.get(..7)?;
    NaiveDate::parse_from_str(&format!("{month_part}-01"), "%Y-%m-%d").ok()
}

/// Chronologically ordered demand observations. Insertion order is time order;
/// the caller is responsible for not repeating period labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandSeries {
    points: Vec<DemandPoint>,
}

impl DemandSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from `(period, value)` pairs. Negative values are
    /// clamped to zero.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut series = Self::new();
        for (period, value) in pairs {
            series.push(period, value);
        }
        series
    }

    pub fn push(&mut self, period: impl Into<String>, value: f64) {
        self.points.push(DemandPoint {
            period: period.into(),
            value: value.max(0.0),
        });
    }

    pub fn points(&self) -> &[DemandPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent observed value.
    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// The calendar month of the most recent observation, if its label parses.
    pub fn last_month(&self) -> Option<NaiveDate> {
        self.points.last().and_then(DemandPoint::month)
    }
}

/// Demand behaviour tag attached to a product in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
    Seasonal,
}

/// A catalog item with its stock thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub sku: String,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub safety_stock: i64,
    pub max_stock: i64,
    pub unit_cost: f64,
    pub unit_price: f64,
    pub supplier: String,
    pub lead_time_days: u32,
    pub demand_trend: DemandTrend,
}

impl Product {
    /// Build a product from a creation request, checking its invariants.
    pub fn from_new(id: impl Into<String>, new: NewProduct) -> Result<Self> {
        let id = id.into();
        let sku = new.sku.unwrap_or_else(|| format!("SKU-{id}"));
        Product {
            id,
            name: new.name,
            category: new.category,
            sku,
            current_stock: new.current_stock,
            reorder_point: new.reorder_point,
            safety_stock: new.safety_stock,
            max_stock: new.max_stock,
            unit_cost: new.unit_cost,
            unit_price: new.unit_price,
            supplier: new.supplier,
            lead_time_days: new.lead_time_days,
            demand_trend: new.demand_trend,
        }
        .validated()
    }

    /// Check the record invariants and return it unchanged if they hold.
    ///
    /// Only non-negativity, `max_stock >= reorder_point` and a positive unit
    /// cost are enforced. `safety_stock > reorder_point` is accepted as-is.
    pub fn validated(self) -> Result<Self> {
        if self.current_stock < 0 {
            return Err(StockcastError::InvalidProduct(format!(
                "{}: current_stock must be >= 0",
                self.id
            )));
        }
        if self.reorder_point < 0 || self.safety_stock < 0 {
            return Err(StockcastError::InvalidProduct(format!(
                "{}: reorder_point and safety_stock must be >= 0",
                self.id
            )));
        }
        if self.max_stock < self.reorder_point {
            return Err(StockcastError::InvalidProduct(format!(
                "{}: max_stock ({}) must be >= reorder_point ({})",
                self.id, self.max_stock, self.reorder_point
            )));
        }
        if !(self.unit_cost > 0.0) {
            return Err(StockcastError::InvalidProduct(format!(
                "{}: unit_cost must be > 0",
                self.id
            )));
        }
        Ok(self)
    }

    /// Value of the stock on hand at unit cost.
    pub fn stock_value(&self) -> f64 {
        self.current_stock as f64 * self.unit_cost
    }
}

/// Request body for creating a product. Omitted fields take catalog defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default = "default_reorder_point")]
    pub reorder_point: i64,
    #[serde(default = "default_safety_stock")]
    pub safety_stock: i64,
    #[serde(default = "default_max_stock")]
    pub max_stock: i64,
    #[serde(default = "default_unit_cost")]
    pub unit_cost: f64,
    #[serde(default = "default_unit_price")]
    pub unit_price: f64,
    #[serde(default = "default_supplier")]
    pub supplier: String,
    #[serde(default = "default_lead_time_days")]
    pub lead_time_days: u32,
    #[serde(default)]
    pub demand_trend: DemandTrend,
}

fn default_reorder_point() -> i64 {
    100
}

fn default_safety_stock() -> i64 {
    50
}

fn default_max_stock() -> i64 {
    1000
}

fn default_unit_cost() -> f64 {
    10.0
}

fn default_unit_price() -> f64 {
    20.0
}

fn default_supplier() -> String {
    "Unknown".to_string()
}

fn default_lead_time_days() -> u32 {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Warehouse,
    DistributionCenter,
}

/// A storage site. Only its aggregate fill level is tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub kind: LocationKind,
    pub capacity: i64,
    pub current_stock: i64,
    pub address: String,
    pub manager: String,
}

impl Location {
    /// Fill level in percent. A location without capacity reports 0.
    pub fn utilization(&self) -> f64 {
        if self.capacity <= 0 {
            return 0.0;
        }
        self.current_stock as f64 / self.capacity as f64 * 100.0
    }
}

/// Read-only view of the catalog handed to the alert engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventorySnapshot {
    pub products: Vec<Product>,
    pub locations: Vec<Location>,
}

impl InventorySnapshot {
    /// Stock on hand valued at unit cost.
    pub fn inventory_value(&self) -> f64 {
        self.products.iter().map(Product::stock_value).sum()
    }

    /// Products at or below their reorder point.
    pub fn low_stock_products(&self) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(|p| classify_stock_state(p).needs_attention())
    }

    pub fn overstock_products(&self) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(|p| classify_stock_state(p) == StockState::Overstock)
    }
}

/// Alert severity. Orders most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Sort rank: critical 0, warning 1, info 2.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

/// The rule that produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    StockoutRisk,
    ReorderRequired,
    Overstock,
    DemandSpike,
    SupplierDelay,
    WeatherImpact,
    LocationCapacity,
}

impl AlertType {
    /// Upper-case code embedded in alert ids.
    pub fn code(&self) -> &'static str {
        match self {
            AlertType::StockoutRisk => "STOCKOUT_RISK",
            AlertType::ReorderRequired => "REORDER_REQUIRED",
            AlertType::Overstock => "OVERSTOCK",
            AlertType::DemandSpike => "DEMAND_SPIKE",
            AlertType::SupplierDelay => "SUPPLIER_DELAY",
            AlertType::WeatherImpact => "WEATHER_IMPACT",
            AlertType::LocationCapacity => "LOCATION_CAPACITY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Cleared,
}

/// An operational alert raised by one of the rule checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// `ALERT-{subject}-{TYPE}-{YYYYmmddHHMMSS}`. Unique per subject, type and
    /// second only.
    pub id: String,

    #[serde(rename = "type")]
    pub alert_type: AlertType,

    pub severity: Severity,

    /// Product name, or a placeholder for alerts not tied to one product.
    pub product: String,

    pub product_id: Option<String>,

    pub category: Option<String>,

    pub location: String,

    pub message: String,

    pub recommended_action: String,

    /// Lower is more urgent.
    pub priority: u8,

    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub status: AlertStatus,

    pub cleared_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Alert {
    /// Create an active alert. `subject` is the id the alert is keyed on
    /// (product id, location id, or a fixed tag).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        alert_type: AlertType,
        severity: Severity,
        subject: &str,
        product: &str,
        message: &str,
        recommended_action: &str,
        priority: u8,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let id = format!(
            "ALERT-{}-{}-{}",
            subject,
            alert_type.code(),
            timestamp.format("%Y%m%d%H%M%S")
        );

        Self {
            id,
            alert_type,
            severity,
            product: product.to_string(),
            product_id: None,
            category: None,
            location: "All Locations".to_string(),
            message: message.to_string(),
            recommended_action: recommended_action.to_string(),
            priority,
            timestamp,
            status: AlertStatus::Active,
            cleared_at: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach the product id and category.
    pub fn with_product(mut self, product: &Product) -> Self {
        self.product_id = Some(product.id.clone());
        self.category = Some(product.category.clone());
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    /// Add metadata.
    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Alert counts by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut summary = AlertSummary {
            total: alerts.len(),
            ..Default::default()
        };

        for alert in alerts {
            match alert.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
        }

        summary
    }
}

/// Response for GET /alerts.
#[derive(Debug, Clone, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
    pub summary: AlertSummary,
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for GET /alerts.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    /// Only return alerts of this severity.
    pub severity: Option<Severity>,

    /// Only return alerts for this product.
    pub product_id: Option<String>,
}

/// Query parameters for GET /forecast/:product_id.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Number of future periods (defaults to the configured horizon).
    pub periods: Option<usize>,
}

/// Kind of entry in the stock movement log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    ProductAdded,
    ProductRemoved,
    Adjustment,
    Transfer,
}

/// An entry in the stock movement log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    /// `MOV-{n:06}`, sequential.
    pub id: String,
    pub product_id: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
}

/// Request body for POST /inventory/adjust.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentRequest {
    pub product_id: String,

    /// Signed change in units.
    pub adjustment: i64,

    #[serde(default = "default_adjustment_reason")]
    pub reason: String,
}

fn default_adjustment_reason() -> String {
    "Manual adjustment".to_string()
}

/// Result of a successful stock adjustment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAdjustment {
    pub product_id: String,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub adjustment: i64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// Request body for POST /inventory/transfer.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub product_id: String,
    pub from_location: String,
    pub to_location: String,
    pub quantity: i64,
}

/// Result of a successful transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockTransfer {
    pub product_id: String,
    pub from: String,
    pub to: String,
    pub quantity: i64,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_product() -> Product {
        Product {
            id: "PROD-001".to_string(),
            name: "Electronics Components".to_string(),
            category: "Electronics".to_string(),
            sku: "ELEC-001-2025".to_string(),
            current_stock: 1250,
            reorder_point: 500,
            safety_stock: 200,
            max_stock: 2000,
            unit_cost: 25.50,
            unit_price: 45.99,
            supplier: "Global Electronics Ltd".to_string(),
            lead_time_days: 5,
            demand_trend: DemandTrend::Increasing,
        }
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(
            parse_period("2024-03"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            parse_period("2024-03-17"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_period("Q1"), None);
        assert_eq!(parse_period("2024-13"), None);
    }

    #[test]
    fn test_series_clamps_negative_values() {
        let series = DemandSeries::from_pairs([("2024-01", 10.0), ("2024-02", -3.0)]);
        assert_eq!(series.values(), vec![10.0, 0.0]);
        assert_eq!(series.last_value(), Some(0.0));
        assert_eq!(series.last_month(), NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_product_validation() {
        assert!(sample_product().validated().is_ok());

        let mut bad = sample_product();
        bad.max_stock = 100;
        assert!(matches!(
            bad.validated(),
            Err(StockcastError::InvalidProduct(_))
        ));

        let mut bad = sample_product();
        bad.unit_cost = 0.0;
        assert!(bad.validated().is_err());

        // Safety above reorder point is trusted caller data
        let mut odd = sample_product();
        odd.safety_stock = 600;
        assert!(odd.validated().is_ok());
    }

    #[test]
    fn test_new_product_defaults() {
        let new: NewProduct =
            serde_json::from_str(r#"{"name": "Widgets", "category": "Hardware"}"#).unwrap();
        let product = Product::from_new("PROD-006", new).unwrap();

        assert_eq!(product.sku, "SKU-PROD-006");
        assert_eq!(product.current_stock, 0);
        assert_eq!(product.reorder_point, 100);
        assert_eq!(product.safety_stock, 50);
        assert_eq!(product.max_stock, 1000);
        assert_eq!(product.supplier, "Unknown");
        assert_eq!(product.demand_trend, DemandTrend::Stable);
    }

    #[test]
    fn test_alert_id_format() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let alert = Alert::new(
            AlertType::StockoutRisk,
            Severity::Critical,
            "PROD-001",
            "Electronics Components",
            "msg",
            "act",
            1,
            ts,
        )
        .with_product(&sample_product())
        .with_metadata("current_stock", 150);

        assert_eq!(alert.id, "ALERT-PROD-001-STOCKOUT_RISK-20250304050607");
        assert_eq!(alert.product_id.as_deref(), Some("PROD-001"));
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(alert.metadata["current_stock"], 150);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical < Severity::Warning);
        assert!(Severity::Warning < Severity::Info);
        assert_eq!(Severity::Info.rank(), 2);
    }

    #[test]
    fn test_location_utilization() {
        let mut location = Location {
            id: "WH-001".to_string(),
            name: "Warehouse North".to_string(),
            kind: LocationKind::Warehouse,
            capacity: 10000,
            current_stock: 9500,
            address: "Industrial Area, North Zone".to_string(),
            manager: "John Smith".to_string(),
        };
        assert!((location.utilization() - 95.0).abs() < 1e-9);

        location.capacity = 0;
        assert_eq!(location.utilization(), 0.0);
    }

    #[test]
    fn test_alert_serializes_type_field() {
        let alert = Alert::new(
            AlertType::Overstock,
            Severity::Info,
            "PROD-003",
            "Medical Supplies",
            "m",
            "a",
            3,
            Utc::now(),
        );
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "overstock");
        assert_eq!(json["severity"], "info");
        assert_eq!(json["status"], "active");
    }
}
