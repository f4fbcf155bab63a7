//! Route definitions for the Microgreen Grower Portal

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Inventory ledger
        .nest("/inventory", inventory_routes())
        // Orders
        .nest("/orders", order_routes())
        // Forecasting
        .route("/forecast", get(handlers::get_demand_forecast))
        .route("/historical-sales", get(handlers::get_historical_sales))
        // Notifications
        .nest("/notifications", notification_routes())
        // Production tracking
        .route("/varieties", get(handlers::get_varieties))
        .route(
            "/plantings",
            get(handlers::list_plantings).post(handlers::create_planting),
        )
        .route("/harvests", get(handlers::list_harvests))
        // Dashboard
        .route("/dashboard-data", get(handlers::get_dashboard_data))
}

/// Inventory ledger routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_batches).post(handlers::create_batch))
        .route(
            "/:batch_id",
            get(handlers::get_batch)
                .put(handlers::update_batch)
                .delete(handlers::delete_batch),
        )
        .route("/:batch_id/log", post(handlers::record_batch_adjustment))
        .route("/:batch_id/logs", get(handlers::get_batch_logs))
}

/// Order routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:order_id",
            get(handlers::get_order)
                .put(handlers::update_order_status)
                .delete(handlers::cancel_order),
        )
}

/// Notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_notifications).post(handlers::create_notification),
        )
        .route(
            "/:notification_id/read",
            put(handlers::mark_notification_read),
        )
}
