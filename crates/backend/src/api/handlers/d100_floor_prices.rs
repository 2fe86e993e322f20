use axum::{http::StatusCode, Json};
use contracts::dashboards::d100_floor_prices::FloorPricesResponse;

use crate::dashboards::d100_floor_prices::service;

/// GET /api/d100/floor_prices
pub async fn get_floor_prices() -> Result<Json<FloorPricesResponse>, StatusCode> {
    match service::get_floor_prices().await {
        Ok(response) => {
            tracing::info!(
                "D100 Dashboard: Returning {} tokens in {} currencies",
                response.tokens.len(),
                response.currencies.len()
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("D100 Dashboard: Failed to get floor prices: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
