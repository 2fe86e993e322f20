use axum::{routing::get, Router};

use crate::api::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D100 FLOOR PRICES DASHBOARD
        // ========================================
        .route(
            "/api/d100/floor_prices",
            get(handlers::d100_floor_prices::get_floor_prices),
        )
}
