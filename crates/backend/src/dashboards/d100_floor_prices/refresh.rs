use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use contracts::dashboards::d100_floor_prices::TokenStats;
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::repository;
use super::snapshot::MarketSnapshot;
use crate::shared::market_data::{CollectionStats, ExchangeRates, MarketDataSource};
use crate::shared::rounding::round_to;

/// Итог одного цикла обновления
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub tokens_updated: usize,
    pub tokens_failed: usize,
    pub rates_updated: bool,
}

/// Обновить данные коллекций и курсы валют, сохранить историю и
/// подменить снимок рынка одной записью.
pub async fn refresh_market_data(
    source: &dyn MarketDataSource,
    db: &DatabaseConnection,
    snapshot: &RwLock<MarketSnapshot>,
    collections: &[String],
) -> Result<RefreshReport> {
    let mut next = snapshot.read().await.clone();
    let mut report = RefreshReport::default();
    let now = Utc::now();

    // 1. Коллекции
    for symbol in collections {
        match source.collection_stats(symbol).await {
            Ok(stats) => {
                if let Err(e) = repository::upsert_sol_rate(db, &stats.symbol, now, stats.floor_price_sol).await {
                    tracing::error!("Failed to store floor price for {}: {}", stats.symbol, e);
                }
                merge_collection_stats(&mut next.tokens, stats);
                report.tokens_updated += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch stats for collection {}: {}", symbol, e);
                report.tokens_failed += 1;
            }
        }
    }
    next.total_price_sol = total_price_sol(&next.tokens);

    // 2. Курсы
    match source.exchange_rates().await {
        Ok(rates) => {
            for (currency, rate) in &rates.rates {
                if let Err(e) = repository::upsert_exchange_rate(db, currency, now, *rate).await {
                    tracing::error!("Failed to store exchange rate for {}: {}", currency, e);
                }
            }
            next.rates_updated_at = Some(format_rates_timestamp(&rates));
            next.currency_rates = rates.rates;
            report.rates_updated = true;
        }
        Err(e) => {
            tracing::warn!("Failed to fetch exchange rates, keeping previous ones: {}", e);
        }
    }
    apply_rates(&mut next);

    *snapshot.write().await = next;
    Ok(report)
}

/// Обновить статистику коллекции, сохранив посчитанные фиатные цены
fn merge_collection_stats(tokens: &mut BTreeMap<String, TokenStats>, stats: CollectionStats) {
    let entry = tokens.entry(stats.symbol.clone()).or_default();
    entry.symbol = stats.symbol;
    entry.floor_price = stats.floor_price_sol;
    entry.listed_count = stats.listed_count;
    entry.avg_price_24hr = stats.avg_price_24hr;
    entry.volume_all = stats.volume_all;
}

pub fn total_price_sol(tokens: &BTreeMap<String, TokenStats>) -> f64 {
    round_to(tokens.values().map(|t| t.floor_price).sum(), 2)
}

/// Пересчитать фиатные цены снимка по текущим курсам
pub fn apply_rates(snapshot: &mut MarketSnapshot) {
    let total = snapshot.total_price_sol;
    snapshot.prices = snapshot
        .currency_rates
        .iter()
        .map(|(currency, rate)| (currency.clone(), (rate * total).round()))
        .collect();

    for token in snapshot.tokens.values_mut() {
        token.fiat_prices = snapshot
            .currency_rates
            .iter()
            .map(|(currency, rate)| (currency.clone(), token.floor_price * rate))
            .collect();
    }
}

/// Время котировки в формате "01 Mar 24 12:00 UTC"
pub fn format_rates_timestamp(rates: &ExchangeRates) -> String {
    let at: DateTime<Utc> = Utc
        .timestamp_opt(rates.timestamp, 0)
        .single()
        .unwrap_or_else(Utc::now);
    at.format("%d %b %y %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d100_floor_prices::repository::list_sol_rates;
    use crate::shared::data::db::bootstrap_schema;
    use crate::shared::market_data::MarketDataError;
    use async_trait::async_trait;
    use sea_orm::Database;

    struct FakeMarket {
        floors: BTreeMap<String, f64>,
        rates: Option<BTreeMap<String, f64>>,
    }

    #[async_trait]
    impl MarketDataSource for FakeMarket {
        async fn collection_stats(&self, symbol: &str) -> Result<CollectionStats, MarketDataError> {
            match self.floors.get(symbol) {
                Some(floor) => Ok(CollectionStats {
                    symbol: symbol.to_string(),
                    floor_price_sol: *floor,
                    listed_count: 10,
                    avg_price_24hr: 0.0,
                    volume_all: 0.0,
                }),
                None => Err(MarketDataError::Status {
                    url: format!("fake://{}", symbol),
                    status: 404,
                }),
            }
        }

        async fn exchange_rates(&self) -> Result<ExchangeRates, MarketDataError> {
            match &self.rates {
                Some(rates) => Ok(ExchangeRates {
                    base: "SOL".to_string(),
                    timestamp: 1709294400,
                    rates: rates.clone(),
                }),
                None => Err(MarketDataError::Unsuccessful("down".to_string())),
            }
        }
    }

    fn floors(items: &[(&str, f64)]) -> BTreeMap<String, f64> {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    async fn memory_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        bootstrap_schema(&db).await.unwrap();
        db
    }

    #[test]
    fn test_apply_rates_rounds_totals_to_whole_units() {
        let mut snapshot = MarketSnapshot::default();
        snapshot.tokens.insert(
            "a".to_string(),
            TokenStats {
                symbol: "a".to_string(),
                floor_price: 1.25,
                ..Default::default()
            },
        );
        snapshot.total_price_sol = 1.25;
        snapshot.currency_rates = floors(&[("USD", 100.3)]);

        apply_rates(&mut snapshot);

        assert_eq!(snapshot.prices["USD"], 125.0);
        assert!((snapshot.tokens["a"].fiat_prices["USD"] - 125.375).abs() < 1e-9);
    }

    #[test]
    fn test_format_rates_timestamp() {
        let rates = ExchangeRates {
            base: "SOL".to_string(),
            timestamp: 1709294400,
            rates: BTreeMap::new(),
        };
        assert_eq!(format_rates_timestamp(&rates), "01 Mar 24 12:00 UTC");
    }

    #[tokio::test]
    async fn test_refresh_updates_snapshot_and_history() {
        let db = memory_db().await;
        let snapshot = RwLock::new(MarketSnapshot::default());
        let market = FakeMarket {
            floors: floors(&[("winter", 1.5), ("love", 0.75)]),
            rates: Some(floors(&[("EUR", 100.0), ("USD", 110.0)])),
        };
        let collections = vec!["winter".to_string(), "love".to_string()];

        let report = refresh_market_data(&market, &db, &snapshot, &collections)
            .await
            .unwrap();

        assert_eq!(
            report,
            RefreshReport {
                tokens_updated: 2,
                tokens_failed: 0,
                rates_updated: true,
            }
        );
        let current = snapshot.read().await;
        assert_eq!(current.total_price_sol, 2.25);
        assert_eq!(current.prices["EUR"], 225.0);
        assert_eq!(current.prices["USD"], 248.0);
        assert_eq!(current.tokens["love"].fiat_prices["EUR"], 75.0);
        assert_eq!(current.rates_updated_at.as_deref(), Some("01 Mar 24 12:00 UTC"));
        assert_eq!(list_sol_rates(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_collection_keeps_previous_value() {
        let db = memory_db().await;
        let snapshot = RwLock::new(MarketSnapshot::default());
        let collections = vec!["winter".to_string(), "love".to_string()];

        let first = FakeMarket {
            floors: floors(&[("winter", 1.5), ("love", 0.75)]),
            rates: Some(floors(&[("EUR", 100.0)])),
        };
        refresh_market_data(&first, &db, &snapshot, &collections)
            .await
            .unwrap();

        let second = FakeMarket {
            floors: floors(&[("winter", 2.0)]),
            rates: None,
        };
        let report = refresh_market_data(&second, &db, &snapshot, &collections)
            .await
            .unwrap();

        assert_eq!(report.tokens_updated, 1);
        assert_eq!(report.tokens_failed, 1);
        assert!(!report.rates_updated);

        let current = snapshot.read().await;
        assert_eq!(current.tokens["love"].floor_price, 0.75);
        assert_eq!(current.total_price_sol, 2.75);
        // old rates are reapplied to the new floor prices
        assert_eq!(current.prices["EUR"], 275.0);
        assert_eq!(current.tokens["winter"].fiat_prices["EUR"], 200.0);
    }
}
