//! Stockcast - Demand forecasting and inventory signal engine.
//!
//! # Overview
//!
//! Stockcast projects future demand for catalog products from their monthly
//! history, turns forecasts into reorder recommendations, and scans the
//! inventory for operational alerts (stockout risk, overstock, capacity and a
//! few simulated external events).
//!
//! The forecasting, reorder and alert logic are plain functions over owned
//! data. Randomness is injected through [`random::RandomSource`] so every
//! stochastic output can be replayed in tests.
//!
//! # Modules
//!
//! - [`model`]: Products, locations, demand series, alerts and stock movements
//! - [`stock`]: Stock state classification
//! - [`forecast`]: Trend estimation, seasonality detection and the forecast engine
//! - [`reorder`]: EOQ-based reorder planning and replenishment scans
//! - [`alerts`]: Rule-based alert generation
//! - [`insights`]: Plain-language forecast insights
//! - [`history`]: Synthetic per-product sales history
//! - [`storage`]: In-memory inventory and alert history stores
//! - [`overview`]: Catalog KPIs
//! - [`api`]: HTTP API handlers
//! - [`config`]: Environment configuration
//! - [`error`]: Error types
//! - [`random`]: Pluggable randomness

pub mod alerts;
pub mod api;
pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod insights;
pub mod model;
pub mod overview;
pub mod random;
pub mod reorder;
pub mod stock;
pub mod storage;
