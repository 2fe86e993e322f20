use anyhow::Result;
use contracts::dashboards::d100_floor_prices::{FloorPricesResponse, PriceHistory, TokenStats};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::repository::{self, ExchangeRateRow, SolRateRow};
use super::snapshot::{market_snapshot, MarketSnapshot};
use crate::shared::config::get_config;
use crate::shared::data::db::get_connection;
use crate::shared::rounding::round_to;

/// Get floor prices dashboard data
pub async fn get_floor_prices() -> Result<FloorPricesResponse> {
    let config = get_config();
    let base = config.fx_rates.base_currency.as_str();
    let fiats = &config.fx_rates.currencies;

    let snapshot = market_snapshot().read().await.clone();
    let (prices, tokens) = apply_taker_fee(&snapshot, config.market.taker_fee, base);

    let (token_histories, combined_history) = match load_histories(base, fiats).await {
        Ok(histories) => histories,
        Err(e) => {
            tracing::error!("D100 Dashboard: Failed to load price history: {}", e);
            (BTreeMap::new(), PriceHistory::default())
        }
    };

    Ok(FloorPricesResponse {
        currencies: config.fx_rates.display_currencies(),
        prices,
        tokens,
        rates_updated_at: snapshot.rates_updated_at,
        combined_history,
        token_histories,
    })
}

async fn load_histories(
    base: &str,
    fiats: &[String],
) -> Result<(BTreeMap<String, PriceHistory>, PriceHistory)> {
    let db = get_connection();
    let sol_rows = repository::list_sol_rates(db).await?;
    let rate_rows = repository::list_exchange_rates(db).await?;

    let token_histories = build_token_histories(&sol_rows, &rate_rows, base, fiats);
    let combined = combine_histories(token_histories.values(), base, fiats);
    Ok((token_histories, combined))
}

/// Цены для отображения: текущий снимок с учётом комиссии покупателя
pub fn apply_taker_fee(
    snapshot: &MarketSnapshot,
    taker_fee: f64,
    base: &str,
) -> (BTreeMap<String, f64>, BTreeMap<String, TokenStats>) {
    let mut totals = snapshot.prices.clone();
    totals.insert(base.to_string(), snapshot.total_price_sol);

    let prices = totals
        .into_iter()
        .map(|(currency, price)| (currency, round_to(price * taker_fee, 3)))
        .collect();

    let tokens = snapshot
        .tokens
        .iter()
        .filter(|(_, token)| !token.symbol.is_empty())
        .map(|(key, token)| {
            let mut adjusted = token.clone();
            adjusted.floor_price = round_to(token.floor_price * taker_fee, 3);
            adjusted.fiat_prices = token
                .fiat_prices
                .iter()
                .map(|(currency, price)| (currency.clone(), round_to(price * taker_fee, 2)))
                .collect();
            (key.clone(), adjusted)
        })
        .collect();

    (prices, tokens)
}

/// История по каждому токену: цена в базовой валюте и пересчёт по курсу
/// того же дня. Нет курса: 0.
pub fn build_token_histories(
    sol_rows: &[SolRateRow],
    rate_rows: &[ExchangeRateRow],
    base: &str,
    fiats: &[String],
) -> BTreeMap<String, PriceHistory> {
    let rates: HashMap<(&str, &str), f64> = rate_rows
        .iter()
        .map(|r| ((r.date.as_str(), r.currency.as_str()), r.rate))
        .collect();

    let mut histories: BTreeMap<String, PriceHistory> = BTreeMap::new();
    for row in sol_rows {
        let history = histories.entry(row.token.clone()).or_insert_with(|| {
            empty_history(base, fiats)
        });
        history.dates.push(row.date.clone());
        push_value(history, base, round_to(row.sol, 2));
        for fiat in fiats.iter().filter(|f| f.as_str() != base) {
            let rate = rates
                .get(&(row.date.as_str(), fiat.as_str()))
                .copied()
                .unwrap_or(0.0);
            push_value(history, fiat, round_to(row.sol * rate, 2));
        }
    }

    for history in histories.values_mut() {
        sort_by_date(history);
    }
    histories
}

/// Суммарная история: по каждой дате сумма значений всех токенов
pub fn combine_histories<'a, I>(histories: I, base: &str, fiats: &[String]) -> PriceHistory
where
    I: IntoIterator<Item = &'a PriceHistory>,
{
    let mut sums: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    let mut dates: BTreeSet<String> = BTreeSet::new();

    for history in histories {
        for (index, date) in history.dates.iter().enumerate() {
            dates.insert(date.clone());
            for (currency, series) in &history.currencies {
                if let Some(value) = series.get(index) {
                    *sums
                        .entry(currency.clone())
                        .or_default()
                        .entry(date.clone())
                        .or_insert(0.0) += value;
                }
            }
        }
    }

    let mut combined = empty_history(base, fiats);
    for date in dates {
        for (currency, series) in combined.currencies.iter_mut() {
            let value = sums
                .get(currency)
                .and_then(|by_date| by_date.get(&date))
                .copied()
                .unwrap_or(0.0);
            series.push(round_to(value, 2));
        }
        combined.dates.push(date);
    }
    combined
}

fn empty_history(base: &str, fiats: &[String]) -> PriceHistory {
    let mut history = PriceHistory::default();
    history.currencies.insert(base.to_string(), Vec::new());
    for fiat in fiats {
        history.currencies.insert(fiat.clone(), Vec::new());
    }
    history
}

fn push_value(history: &mut PriceHistory, currency: &str, value: f64) {
    history
        .currencies
        .entry(currency.to_string())
        .or_default()
        .push(value);
}

/// Repository rows come ordered; keep the series aligned if they do not.
fn sort_by_date(history: &mut PriceHistory) {
    if history.dates.windows(2).all(|w| w[0] <= w[1]) {
        return;
    }
    let mut order: Vec<usize> = (0..history.dates.len()).collect();
    order.sort_by(|a, b| history.dates[*a].cmp(&history.dates[*b]));
    history.dates = order.iter().map(|i| history.dates[*i].clone()).collect();
    for series in history.currencies.values_mut() {
        *series = order.iter().map(|i| series[*i]).collect();
    }
}
