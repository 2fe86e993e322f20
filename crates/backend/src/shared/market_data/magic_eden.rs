use serde::Deserialize;

use super::{build_http_client, CollectionStats, MarketDataError};
use crate::shared::rounding::{floor_to, round_to};

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Ответ `/v2/collections/{symbol}/stats`
#[derive(Debug, Deserialize)]
struct CollectionStatsResponse {
    #[serde(default)]
    symbol: String,
    /// Floor price in lamports
    #[serde(rename = "floorPrice", default)]
    floor_price: f64,
    #[serde(rename = "listedCount", default)]
    listed_count: u64,
    /// Lamports, as are the volumes
    #[serde(rename = "avgPrice24hr", default)]
    avg_price_24hr: f64,
    #[serde(rename = "volumeAll", default)]
    volume_all: f64,
}

/// Клиент публичного API Magic Eden
pub struct MagicEdenClient {
    client: reqwest::Client,
    base_url: String,
}

impl MagicEdenClient {
    pub fn new(base_url: &str) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn stats_url(&self, symbol: &str) -> String {
        format!("{}/v2/collections/{}/stats", self.base_url, symbol)
    }

    pub async fn collection_stats(&self, symbol: &str) -> Result<CollectionStats, MarketDataError> {
        let url = self.stats_url(symbol);
        tracing::debug!("Requesting collection stats: {}", url);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_collection_stats(&body)
    }
}

/// Разбор ответа; цены переводятся из лампортов в SOL,
/// floor price обрезается до 2 знаков.
pub fn parse_collection_stats(body: &str) -> Result<CollectionStats, MarketDataError> {
    let raw: CollectionStatsResponse = serde_json::from_str(body)?;
    if raw.symbol.is_empty() {
        return Err(MarketDataError::Unsuccessful(
            "collection stats without symbol".to_string(),
        ));
    }

    Ok(CollectionStats {
        symbol: raw.symbol,
        floor_price_sol: floor_to(raw.floor_price / LAMPORTS_PER_SOL, 2),
        listed_count: raw.listed_count,
        avg_price_24hr: round_to(raw.avg_price_24hr / LAMPORTS_PER_SOL, 3),
        volume_all: round_to(raw.volume_all / LAMPORTS_PER_SOL, 3),
    })
}
