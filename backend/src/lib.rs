//! Microgreen Grower Portal - backend library
//!
//! Tracks harvested tray inventory and customer orders for a small farm and
//! serves short-horizon demand estimates. The inventory ledger and order
//! transaction engine are the correctness core: tray counts never go
//! negative, every mutation is logged, and multi-item orders land
//! all-or-nothing. Everything else is read-side projection or glue.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod seed;
pub mod services;
pub mod store;

pub use config::Config;

use external::{DemandOracle, EmailSink, HttpDemandOracle, NotificationSink, UnconfiguredOracle};
use services::{
    ForecastService, InventoryService, NotificationService, OrderService, ProductionService,
    ReportingService,
};
use store::{LedgerStore, NotificationStore, OrderStore, ProductionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub inventory: InventoryService,
    pub orders: OrderService,
    pub forecast: ForecastService,
    pub notifications: NotificationService,
    pub production: ProductionService,
    pub reporting: ReportingService,
}

impl AppState {
    /// Wire all services against fresh in-memory stores, with the given
    /// external collaborators. Tests inject mock sinks and oracles here.
    pub fn new(
        config: Config,
        sink: Arc<dyn NotificationSink>,
        oracle: Arc<dyn DemandOracle>,
    ) -> Self {
        let ledger = Arc::new(LedgerStore::new());
        let order_store = Arc::new(OrderStore::new());
        let notification_store = Arc::new(NotificationStore::new());
        let production_store = Arc::new(ProductionStore::new());

        let notifications = NotificationService::new(notification_store, sink);
        let inventory = InventoryService::new(
            ledger.clone(),
            notifications.clone(),
            config.inventory.low_stock_threshold,
        );
        let orders = OrderService::new(
            order_store.clone(),
            inventory.clone(),
            config.orders.default_price_per_tray,
        );
        let forecast = ForecastService::new(
            order_store.clone(),
            oracle,
            config.forecast.lookback_days,
        );
        let production = ProductionService::new(production_store.clone());
        let reporting = ReportingService::new(ledger, order_store, production_store);

        Self {
            config: Arc::new(config),
            inventory,
            orders,
            forecast,
            notifications,
            production,
            reporting,
        }
    }

    /// Production wiring derived from configuration alone.
    pub fn from_config(config: Config) -> Self {
        let sink: Arc<dyn NotificationSink> = Arc::new(EmailSink::new(config.smtp.clone()));
        let oracle: Arc<dyn DemandOracle> = if config.forecast.oracle_configured() {
            Arc::new(HttpDemandOracle::new(config.forecast.oracle_endpoint.clone()))
        } else {
            Arc::new(UnconfiguredOracle)
        };
        Self::new(config, sink, oracle)
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Microgreen Grower Portal API v1.0"
}
