use contracts::dashboards::d100_floor_prices::FloorPricesResponse;
use gloo_net::http::Request;

const API_BASE: &str = "/api/d100";

/// Получить текущие цены и историю
pub async fn get_floor_prices() -> Result<FloorPricesResponse, String> {
    let url = format!("{}/floor_prices", API_BASE);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let data: FloorPricesResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(data)
}
