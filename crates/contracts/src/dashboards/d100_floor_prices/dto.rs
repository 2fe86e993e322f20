use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response for floor prices dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorPricesResponse {
    /// Currencies in display order: base currency first (e.g. ["SOL", "USD", "EUR"])
    pub currencies: Vec<String>,
    /// Total price of all tracked collections per currency, taker fee included
    pub prices: BTreeMap<String, f64>,
    /// Per-collection stats keyed by collection symbol
    pub tokens: BTreeMap<String, TokenStats>,
    /// Timestamp of the exchange rates, None until the first successful refresh
    pub rates_updated_at: Option<String>,
    /// Summed history of all collections
    pub combined_history: PriceHistory,
    /// History per collection symbol
    pub token_histories: BTreeMap<String, PriceHistory>,
}

/// Collection stats with prices converted to fiat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenStats {
    pub symbol: String,
    /// Floor price in base currency (SOL)
    pub floor_price: f64,
    pub listed_count: u64,
    /// Average sale price over the last 24h, SOL
    pub avg_price_24hr: f64,
    /// All-time traded volume, SOL
    pub volume_all: f64,
    /// Floor price per fiat currency
    pub fiat_prices: BTreeMap<String, f64>,
}

impl TokenStats {
    /// Price in the given currency; the base currency maps to `floor_price`.
    pub fn price_in(&self, currency: &str, base_currency: &str) -> Option<f64> {
        if currency == base_currency {
            Some(self.floor_price)
        } else {
            self.fiat_prices.get(currency).copied()
        }
    }
}

/// Price series by date.
///
/// Every series in `currencies` has exactly `dates.len()` points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Dates in format "YYYY-MM-DD", ascending
    pub dates: Vec<String>,
    pub currencies: BTreeMap<String, Vec<f64>>,
}

impl PriceHistory {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Value of `currency` at position `index`
    pub fn value_at(&self, currency: &str, index: usize) -> Option<f64> {
        self.currencies
            .get(currency)
            .and_then(|series| series.get(index))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_in_base_and_fiat() {
        let mut token = TokenStats {
            symbol: "tomorrowland_winter".to_string(),
            floor_price: 1.5,
            ..Default::default()
        };
        token.fiat_prices.insert("EUR".to_string(), 210.0);

        assert_eq!(token.price_in("SOL", "SOL"), Some(1.5));
        assert_eq!(token.price_in("EUR", "SOL"), Some(210.0));
        assert_eq!(token.price_in("GBP", "SOL"), None);
    }

    #[test]
    fn test_response_json_shape() {
        let mut response = FloorPricesResponse {
            currencies: vec!["SOL".to_string(), "USD".to_string()],
            ..Default::default()
        };
        response.prices.insert("USD".to_string(), 512.5);
        response.combined_history.dates.push("2024-03-01".to_string());
        response
            .combined_history
            .currencies
            .insert("USD".to_string(), vec![500.0]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["prices"]["USD"], 512.5);
        assert_eq!(json["rates_updated_at"], serde_json::Value::Null);
        assert_eq!(json["combined_history"]["dates"][0], "2024-03-01");

        let back: FloorPricesResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back.combined_history.value_at("USD", 0), Some(500.0));
        assert_eq!(back.combined_history.value_at("USD", 1), None);
    }
}
