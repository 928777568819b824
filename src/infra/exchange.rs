//! USD → PKR lookup against the exchange-rate provider.

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use super::USER_AGENT;

pub const BASE_CURRENCY: &str = "USD";
pub const QUOTE_CURRENCY: &str = "PKR";

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("exchange provider answered {0}")]
    Upstream(StatusCode),
    #[error("exchange provider returned no PKR rate")]
    MissingRate,
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[derive(Clone)]
pub struct ExchangeClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl ExchangeClient {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Result<Self, ExchangeError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn latest_url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join("latest")?;
        url.query_pairs_mut()
            .append_pair("base", BASE_CURRENCY)
            .append_pair("symbols", QUOTE_CURRENCY);
        Ok(url)
    }

    /// Current PKR per USD.
    pub async fn dollar_rate(&self) -> Result<f64, ExchangeError> {
        let url = self.latest_url()?;
        debug!("Requesting exchange rate from {url}");

        let response = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Upstream(status));
        }

        let latest: LatestRates = response.json().await?;
        pick_rate(&latest)
    }
}

fn pick_rate(latest: &LatestRates) -> Result<f64, ExchangeError> {
    latest
        .rates
        .get(QUOTE_CURRENCY)
        .copied()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .ok_or(ExchangeError::MissingRate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn latest_url_asks_for_pkr_against_usd() {
        let client = ExchangeClient::new(
            Url::parse("https://api.apilayer.com/exchangerates_data/").unwrap(),
            "key",
        )
        .unwrap();
        assert_eq!(
            client.latest_url().unwrap().as_str(),
            "https://api.apilayer.com/exchangerates_data/latest?base=USD&symbols=PKR"
        );
    }

    #[test]
    fn picks_pkr_from_provider_payload() {
        let latest: LatestRates = serde_json::from_value(json!({
            "success": true,
            "base": "USD",
            "rates": { "PKR": 281.35 }
        }))
        .unwrap();
        assert_eq!(pick_rate(&latest).unwrap(), 281.35);
    }

    #[test]
    fn missing_or_zero_rate_is_an_error() {
        let empty: LatestRates = serde_json::from_value(json!({ "success": false })).unwrap();
        assert!(matches!(pick_rate(&empty), Err(ExchangeError::MissingRate)));

        let zero: LatestRates = serde_json::from_value(json!({ "rates": { "PKR": 0.0 } })).unwrap();
        assert!(matches!(pick_rate(&zero), Err(ExchangeError::MissingRate)));
    }
}
