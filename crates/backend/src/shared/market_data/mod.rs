pub mod fx_rates;
pub mod magic_eden;

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

pub use fx_rates::FxRatesClient;
pub use magic_eden::MagicEdenClient;

/// Ошибки внешних API рыночных данных
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API reported an unsuccessful response: {0}")]
    Unsuccessful(String),
}

/// Статистика коллекции, floor price уже в SOL
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub symbol: String,
    pub floor_price_sol: f64,
    pub listed_count: u64,
    pub avg_price_24hr: f64,
    pub volume_all: f64,
}

/// Курсы базовой валюты к фиатным
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    pub base: String,
    /// Unix timestamp (seconds) of the quote
    pub timestamp: i64,
    pub rates: BTreeMap<String, f64>,
}

/// Источник рыночных данных (маркетплейс + курсы валют)
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn collection_stats(&self, symbol: &str) -> Result<CollectionStats, MarketDataError>;

    async fn exchange_rates(&self) -> Result<ExchangeRates, MarketDataError>;
}

/// Боевой источник: Magic Eden + fxratesapi
pub struct HttpMarketData {
    pub magic_eden: MagicEdenClient,
    pub fx_rates: FxRatesClient,
}

impl HttpMarketData {
    pub fn from_config(config: &crate::shared::config::Config) -> Result<Self, MarketDataError> {
        Ok(Self {
            magic_eden: MagicEdenClient::new(&config.magic_eden.base_url)?,
            fx_rates: FxRatesClient::new(&config.fx_rates)?,
        })
    }
}

#[async_trait]
impl MarketDataSource for HttpMarketData {
    async fn collection_stats(&self, symbol: &str) -> Result<CollectionStats, MarketDataError> {
        self.magic_eden.collection_stats(symbol).await
    }

    async fn exchange_rates(&self) -> Result<ExchangeRates, MarketDataError> {
        self.fx_rates.latest().await
    }
}

/// Общий HTTP клиент с таймаутом
pub(crate) fn build_http_client() -> Result<reqwest::Client, MarketDataError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()?)
}
