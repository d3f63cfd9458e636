//! Error types for Stockcast.
//!
//! Only operations that touch the inventory store can fail. Forecasting,
//! classification and alert generation are total functions: an empty or short
//! history is routed to a fallback forecast instead of being reported as an
//! error, and every division guards against a zero denominator.

use thiserror::Error;

/// Errors surfaced by the inventory store and record constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StockcastError {
    /// An unknown product or location id was referenced.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// A stock movement would leave the store in an invalid state.
    /// The store is left unchanged when this is returned.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A product record violates one of its invariants.
    #[error("invalid product: {0}")]
    InvalidProduct(String),
}

impl StockcastError {
    pub fn product_not_found(id: &str) -> Self {
        StockcastError::NotFound {
            kind: "product",
            id: id.to_string(),
        }
    }

    pub fn location_not_found(id: &str) -> Self {
        StockcastError::NotFound {
            kind: "location",
            id: id.to_string(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, StockcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StockcastError::product_not_found("PROD-999");
        assert_eq!(err.to_string(), "product 'PROD-999' not found");

        let err = StockcastError::location_not_found("WH-404");
        assert_eq!(err.to_string(), "location 'WH-404' not found");
    }
}
