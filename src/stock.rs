//! Stock state classification.

use serde::{Deserialize, Serialize};

use crate::model::Product;

/// Where a product's stock sits relative to its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockState {
    /// At or below safety stock.
    Critical,
    /// Above safety stock but at or below the reorder point.
    Low,
    /// Between the reorder point and the maximum.
    Normal,
    /// Above the maximum.
    Overstock,
    /// The product is not in the catalog.
    Unknown,
}

impl StockState {
    /// Classify raw stock figures.
    ///
    /// Checks run in a fixed order: safety stock, reorder point, maximum. The
    /// safety check wins even when `safety_stock > reorder_point`.
    pub fn classify(current: i64, safety_stock: i64, reorder_point: i64, max_stock: i64) -> Self {
        if current <= safety_stock {
            StockState::Critical
        } else if current <= reorder_point {
            StockState::Low
        } else if current > max_stock {
            StockState::Overstock
        } else {
            StockState::Normal
        }
    }

    /// Critical or low.
    pub fn needs_attention(&self) -> bool {
        matches!(self, StockState::Critical | StockState::Low)
    }
}

/// Classify a catalog product.
pub fn classify_stock_state(product: &Product) -> StockState {
    StockState::classify(
        product.current_stock,
        product.safety_stock,
        product.reorder_point,
        product.max_stock,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(StockState::classify(150, 200, 500, 2000), StockState::Critical);
        assert_eq!(StockState::classify(400, 200, 500, 2000), StockState::Low);
        assert_eq!(StockState::classify(1000, 200, 500, 2000), StockState::Normal);
        assert_eq!(StockState::classify(2100, 200, 500, 2000), StockState::Overstock);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(StockState::classify(200, 200, 500, 2000), StockState::Critical);
        assert_eq!(StockState::classify(500, 200, 500, 2000), StockState::Low);
        assert_eq!(StockState::classify(2000, 200, 500, 2000), StockState::Normal);
    }

    #[test]
    fn test_safety_check_takes_precedence() {
        // Inverted thresholds are not corrected
        assert_eq!(StockState::classify(550, 600, 500, 2000), StockState::Critical);
    }

    #[test]
    fn test_needs_attention() {
        assert!(StockState::Critical.needs_attention());
        assert!(StockState::Low.needs_attention());
        assert!(!StockState::Normal.needs_attention());
        assert!(!StockState::Overstock.needs_attention());
        assert!(!StockState::Unknown.needs_attention());
    }
}
