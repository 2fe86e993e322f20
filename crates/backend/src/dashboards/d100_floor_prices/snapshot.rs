use contracts::dashboards::d100_floor_prices::TokenStats;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Последнее известное состояние рынка (без комиссии)
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    /// Stats per collection symbol; `floor_price` in SOL
    pub tokens: BTreeMap<String, TokenStats>,
    /// SOL -> fiat exchange rates
    pub currency_rates: BTreeMap<String, f64>,
    /// Total price of all collections per fiat currency, whole units
    pub prices: BTreeMap<String, f64>,
    pub total_price_sol: f64,
    pub rates_updated_at: Option<String>,
}

static MARKET_SNAPSHOT: Lazy<RwLock<MarketSnapshot>> =
    Lazy::new(|| RwLock::new(MarketSnapshot::default()));

pub fn market_snapshot() -> &'static RwLock<MarketSnapshot> {
    &MARKET_SNAPSHOT
}
