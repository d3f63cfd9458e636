//! Stockcast - Demand forecasting and inventory signal service.
//!
//! # API Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /products`, `POST /products`, `DELETE /products/:id` - Catalog
//! - `GET /overview` - KPIs and location utilization
//! - `POST /inventory/adjust`, `POST /inventory/transfer` - Stock movements
//! - `GET /inventory/tracking/:product_id` - Movement log for a product
//! - `GET /forecast/:product_id` - Demand forecast and insights
//! - `GET /alerts`, `GET /alerts/history`, `POST /alerts/:id/clear` - Alerts
//! - `GET /replenishment` - Reorder recommendations

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stockcast::api::{AppState, router};
use stockcast::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("stockcast=info".parse()?))
        .init();

    let config = Config::from_env();

    info!(
        port = config.port,
        forecast_periods = config.forecast_periods,
        history_months = config.history_months,
        seed_catalog = config.seed_catalog,
        "Starting Stockcast server"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config);
    info!(
        products = state.inventory.products().len(),
        locations = state.inventory.locations().len(),
        "Inventory initialized"
    );

    let app = router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Stockcast is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
