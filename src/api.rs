//! HTTP API handlers for Stockcast.
//!
//! The handlers only translate between HTTP and the library: they read the
//! shared stores, call the engine with the current clock and a thread-local
//! random source, and map [`StockcastError`] onto status codes.
//!
//! | Route                                  | Handler              |
//! |----------------------------------------|----------------------|
//! | `GET /health`                          | [`health_check`]     |
//! | `GET /products`, `POST /products`      | [`list_products`], [`create_product`] |
//! | `DELETE /products/:id`                 | [`delete_product`]   |
//! | `GET /overview`                        | [`get_overview`]     |
//! | `POST /inventory/adjust`               | [`adjust_stock`]     |
//! | `POST /inventory/transfer`             | [`transfer_stock`]   |
//! | `GET /inventory/tracking/:product_id`  | [`get_tracking`]     |
//! | `GET /forecast/:product_id`            | [`get_forecast`]     |
//! | `GET /alerts`                          | [`get_alerts`]       |
//! | `GET /alerts/history`                  | [`get_alert_history`]|
//! | `POST /alerts/:id/clear`               | [`clear_alert`]      |
//! | `GET /replenishment`                   | [`get_replenishment`]|

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::alerts::{filter_by_product, filter_by_severity, generate_alerts};
use crate::config::Config;
use crate::error::StockcastError;
use crate::forecast::{Forecast, ForecastEngine, ForecastMethod};
use crate::history::SalesHistory;
use crate::insights::{Insight, forecast_insights};
use crate::model::{
    AdjustmentRequest, Alert, AlertSummary, AlertsQuery, AlertsResponse, DemandSeries,
    ForecastQuery, NewProduct, Product, StockAdjustment, StockMovement, StockTransfer,
    TransferRequest,
};
use crate::overview::{Overview, build_overview};
use crate::random::ThreadRandom;
use crate::reorder::{ReplenishmentPlan, plan_replenishment};
use crate::stock::StockState;
use crate::storage::{AlertHistory, DEFAULT_MOVEMENT_LIMIT, Inventory};

/// Largest horizon accepted by `GET /forecast/:product_id`.
pub const MAX_FORECAST_PERIODS: usize = 60;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub inventory: Inventory,
    pub alert_history: AlertHistory,
    pub sales_history: Arc<SalesHistory>,
    pub engine: Arc<ForecastEngine>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let inventory = if config.seed_catalog {
            Inventory::with_demo_catalog()
        } else {
            Inventory::new()
        };

        Self {
            inventory,
            alert_history: AlertHistory::new(),
            sales_history: Arc::new(SalesHistory::new(config.history_months)),
            engine: Arc::new(ForecastEngine::default()),
            config,
        }
    }

    /// Run a fresh alert scan and fold the result into the history.
    fn scan_alerts(&self) -> Vec<Alert> {
        let alerts = generate_alerts(&self.inventory.snapshot(), Utc::now(), &mut ThreadRandom);
        let recorded = self.alert_history.record(&alerts);
        if recorded > 0 {
            info!(recorded, total = self.alert_history.len(), "Alert history updated");
        }
        alerts
    }
}

/// Build the router with every route bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", delete(delete_product))
        .route("/overview", get(get_overview))
        .route("/inventory/adjust", post(adjust_stock))
        .route("/inventory/transfer", post(transfer_stock))
        .route("/inventory/tracking/:product_id", get(get_tracking))
        .route("/forecast/:product_id", get(get_forecast))
        .route("/alerts", get(get_alerts))
        .route("/alerts/history", get(get_alert_history))
        .route("/alerts/:id/clear", post(clear_alert))
        .route("/replenishment", get(get_replenishment))
        .with_state(state)
}

fn error_status(err: &StockcastError) -> StatusCode {
    match err {
        StockcastError::NotFound { .. } => StatusCode::NOT_FOUND,
        StockcastError::InvalidQuantity(_) | StockcastError::InvalidProduct(_) => {
            StatusCode::BAD_REQUEST
        }
    }
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// GET /products - The full catalog.
#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Json<ProductsResponse> {
    Json(ProductsResponse {
        products: state.inventory.products(),
    })
}

/// POST /products - Add a product.
///
/// # Request Body
///
/// ```json
/// {
///     "name": "Solar Panels",
///     "category": "Energy",
///     "current_stock": 300,
///     "unit_cost": 120.0
/// }
/// ```
///
/// Omitted fields take catalog defaults. Returns `201 Created` with the stored
/// product, or `400` if the record is invalid.
#[instrument(skip(state, request))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), StatusCode> {
    match state.inventory.add_product(request) {
        Ok(product) => {
            state.scan_alerts();
            Ok((StatusCode::CREATED, Json(product)))
        }
        Err(e) => Err(error_status(&e)),
    }
}

/// DELETE /products/:id - Remove a product.
#[instrument(skip(state))]
pub async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.inventory.remove_product(&id) {
        state.sales_history.forget(&id);
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

/// GET /overview - Catalog KPIs, recent alerts and location utilization.
#[instrument(skip(state))]
pub async fn get_overview(State(state): State<AppState>) -> Json<Overview> {
    let alerts = state.scan_alerts();
    let overview = build_overview(&state.inventory.snapshot(), &alerts, Utc::now());

    info!(
        products = overview.kpis.total_products,
        critical_alerts = overview.kpis.critical_alerts,
        "Overview queried"
    );
    Json(overview)
}

/// POST /inventory/adjust - Apply a signed stock change.
///
/// # Request Body
///
/// ```json
/// { "product_id": "PROD-001", "adjustment": -50, "reason": "Damaged" }
/// ```
#[instrument(skip(state, request))]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Json(request): Json<AdjustmentRequest>,
) -> Result<Json<StockAdjustment>, StatusCode> {
    let result = state
        .inventory
        .adjust_stock(&request.product_id, request.adjustment, &request.reason)
        .map_err(|e| {
            warn!(error = %e, "Stock adjustment failed");
            error_status(&e)
        })?;

    state.scan_alerts();
    Ok(Json(result))
}

/// POST /inventory/transfer - Move stock between two locations.
#[instrument(skip(state, request))]
pub async fn transfer_stock(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<StockTransfer>, StatusCode> {
    let result = state
        .inventory
        .transfer_stock(
            &request.product_id,
            &request.from_location,
            &request.to_location,
            request.quantity,
        )
        .map_err(|e| {
            warn!(error = %e, "Stock transfer failed");
            error_status(&e)
        })?;

    state.scan_alerts();
    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub product: Product,
    pub stock_state: StockState,
    pub movement_history: Vec<StockMovement>,
    pub total_movements: usize,
}

/// GET /inventory/tracking/:product_id - Stock state and recent movements.
#[instrument(skip(state))]
pub async fn get_tracking(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<TrackingResponse>, StatusCode> {
    let product = state.inventory.product(&product_id).ok_or_else(|| {
        warn!(product_id = %product_id, "Tracking requested for unknown product");
        StatusCode::NOT_FOUND
    })?;

    let movement_history = state
        .inventory
        .movement_history(Some(&product_id), DEFAULT_MOVEMENT_LIMIT);

    Ok(Json(TrackingResponse {
        stock_state: state.inventory.stock_state(&product_id),
        total_movements: movement_history.len(),
        movement_history,
        product,
    }))
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub product_id: String,
    pub historical: DemandSeries,
    pub forecast: Forecast,
    pub insights: Vec<Insight>,
    pub model_info: ModelInfo,
}

/// Echo of the forecast's method and quality figures.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    #[serde(rename = "type")]
    pub model_type: ForecastMethod,
    pub accuracy: f64,
    pub confidence: f64,
}

impl ModelInfo {
    fn from_forecast(forecast: &Forecast) -> Self {
        Self {
            model_type: forecast.method,
            accuracy: forecast.accuracy,
            confidence: forecast.confidence,
        }
    }
}

/// GET /forecast/:product_id - Demand forecast with insights.
///
/// # Query Parameters
///
/// - `periods` (optional): Months to forecast, 1 to 60 (default: configured horizon)
#[instrument(skip(state))]
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, StatusCode> {
    let periods = query.periods.unwrap_or(state.config.forecast_periods);
    if periods == 0 || periods > MAX_FORECAST_PERIODS {
        warn!(periods, "Forecast horizon out of range");
        return Err(StatusCode::BAD_REQUEST);
    }

    let product = state.inventory.product(&product_id).ok_or_else(|| {
        warn!(product_id = %product_id, "Forecast requested for unknown product");
        StatusCode::NOT_FOUND
    })?;

    let today = Utc::now().date_naive();
    let mut rng = ThreadRandom;
    let historical = state.sales_history.history_for(&product, today, &mut rng);
    let forecast = state.engine.forecast_with_base(
        &historical,
        periods,
        product.current_stock as f64,
        today,
        &mut rng,
    );
    let insights = forecast_insights(&forecast, &product);

    info!(
        product_id = %product_id,
        periods,
        method = ?forecast.method,
        trend = ?forecast.trend,
        "Forecast generated"
    );

    Ok(Json(ForecastResponse {
        product_id,
        historical,
        model_info: ModelInfo::from_forecast(&forecast),
        forecast,
        insights,
    }))
}

/// GET /alerts - Run a fresh scan.
///
/// # Query Parameters
///
/// - `severity` (optional): critical, warning or info
/// - `product_id` (optional): only alerts raised for this product
///
/// The summary counts the filtered alerts.
#[instrument(skip(state))]
pub async fn get_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Json<AlertsResponse> {
    let mut alerts = state.scan_alerts();

    if let Some(severity) = query.severity {
        alerts = filter_by_severity(&alerts, severity);
    }
    if let Some(product_id) = &query.product_id {
        alerts = filter_by_product(&alerts, product_id);
    }

    let summary = AlertSummary::from_alerts(&alerts);
    info!(
        alert_count = summary.total,
        critical = summary.critical,
        "Alerts queried"
    );

    Json(AlertsResponse {
        alerts,
        summary,
        timestamp: Utc::now(),
    })
}

/// GET /alerts/history - Every alert recorded so far, cleared ones included.
#[instrument(skip(state))]
pub async fn get_alert_history(State(state): State<AppState>) -> Json<AlertsResponse> {
    let alerts = state.alert_history.all();

    Json(AlertsResponse {
        summary: AlertSummary::from_alerts(&alerts),
        alerts,
        timestamp: Utc::now(),
    })
}

/// POST /alerts/:id/clear - Mark a recorded alert as cleared.
#[instrument(skip(state))]
pub async fn clear_alert(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.alert_history.clear(&id, Utc::now()) {
        StatusCode::OK
    } else {
        warn!(alert_id = %id, "Clear requested for unknown alert");
        StatusCode::NOT_FOUND
    }
}

/// GET /replenishment - Reorder recommendations across the catalog.
#[instrument(skip(state))]
pub async fn get_replenishment(State(state): State<AppState>) -> Json<ReplenishmentPlan> {
    let plan = plan_replenishment(
        &state.engine,
        &state.inventory.products(),
        Utc::now().date_naive(),
        &mut ThreadRandom,
    );

    info!(
        total_items = plan.summary.total_items,
        total_investment = plan.summary.total_investment,
        "Replenishment planned"
    );
    Json(plan)
}
