use serde::Deserialize;
use std::collections::BTreeMap;

use super::{build_http_client, ExchangeRates, MarketDataError};
use crate::shared::config::FxRatesConfig;

/// Ответ `/latest` fxratesapi
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    base: String,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
    #[serde(default)]
    description: Option<String>,
}

/// Клиент API курсов валют
pub struct FxRatesClient {
    client: reqwest::Client,
    base_url: String,
    base_currency: String,
    currencies: Vec<String>,
    api_key: String,
}

impl FxRatesClient {
    pub fn new(config: &FxRatesConfig) -> Result<Self, MarketDataError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            base_currency: config.base_currency.clone(),
            currencies: config.currencies.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// URL запроса последних курсов (без ключа, для логов)
    pub fn latest_url(&self) -> String {
        format!(
            "{}/latest?base={}&currencies={}&resolution=1m&amount=1&places=6&format=json",
            self.base_url,
            self.base_currency,
            self.currencies.join(",")
        )
    }

    pub async fn latest(&self) -> Result<ExchangeRates, MarketDataError> {
        let url = self.latest_url();
        tracing::debug!("Requesting exchange rates: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
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
        parse_latest_rates(&body)
    }
}

pub fn parse_latest_rates(body: &str) -> Result<ExchangeRates, MarketDataError> {
    let raw: LatestRatesResponse = serde_json::from_str(body)?;
    if !raw.success {
        return Err(MarketDataError::Unsuccessful(
            raw.description
                .unwrap_or_else(|| "success=false".to_string()),
        ));
    }

    Ok(ExchangeRates {
        base: raw.base,
        timestamp: raw.timestamp,
        rates: raw.rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest_rates() {
        let body = r#"{
            "success": true,
            "terms": "https://fxratesapi.com/legal/terms-conditions",
            "privacy": "https://fxratesapi.com/legal/privacy-policy",
            "timestamp": 1709294400,
            "date": "2024-03-01T12:00:00.000Z",
            "base": "SOL",
            "rates": {"EUR": 118.25, "GBP": 101.1, "SEK": 1320.5, "USD": 128.4}
        }"#;

        let rates = parse_latest_rates(body).unwrap();
        assert_eq!(rates.base, "SOL");
        assert_eq!(rates.timestamp, 1709294400);
        assert_eq!(rates.rates.len(), 4);
        assert_eq!(rates.rates["USD"], 128.4);
    }

    #[test]
    fn test_parse_latest_rates_unsuccessful() {
        let body = r#"{"success": false, "description": "invalid api key"}"#;
        match parse_latest_rates(body) {
            Err(MarketDataError::Unsuccessful(msg)) => assert_eq!(msg, "invalid api key"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_latest_url_lists_currencies() {
        let client = FxRatesClient::new(&FxRatesConfig::default()).unwrap();
        assert_eq!(
            client.latest_url(),
            "https://api.fxratesapi.com/latest?base=SOL&currencies=USD,EUR,GBP,SEK&resolution=1m&amount=1&places=6&format=json"
        );
    }
}
