//! Client side of the `rates-gateway` endpoints.
//!
//! The UI never talks to the exchange provider directly (the API key stays on
//! the gateway) and clears the remote database through the gateway as well.

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::{remote_message, USER_AGENT};
use crate::domain::Province;

pub const DOLLAR_RATE_PATH: &str = "api/dollar-rate";
pub const CLEAR_DATABASE_PATH: &str = "api/clear-database";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Remote { status: StatusCode, message: String },
    #[error("gateway response did not include a rate")]
    MissingRate,
}

#[derive(Debug, Deserialize)]
struct DollarRateBody {
    #[serde(default)]
    rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
}

impl GatewayClient {
    pub fn new(base_url: Url) -> Result<Self, GatewayError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, base_url })
    }

    pub fn clear_url(&self, province: Province) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(CLEAR_DATABASE_PATH)?;
        url.query_pairs_mut().append_pair("province", province.slug());
        Ok(url)
    }

    pub async fn dollar_rate(&self) -> Result<f64, GatewayError> {
        let url = self.base_url.join(DOLLAR_RATE_PATH)?;
        debug!("Requesting dollar rate from {url}");
        let body: DollarRateBody = self.fetch_json(self.http.get(url)).await?;
        body.rate
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or(GatewayError::MissingRate)
    }

    pub async fn clear_database(&self, province: Province) -> Result<String, GatewayError> {
        let url = self.clear_url(province)?;
        let body: MessageBody = self.fetch_json(self.http.delete(url)).await?;
        Ok(body
            .message
            .unwrap_or_else(|| format!("Cleared {} rates", province.label())))
    }

    async fn fetch_json<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(GatewayError::Remote {
            status,
            message: remote_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clear_url_carries_province() {
        let client = GatewayClient::new(Url::parse("http://localhost:3000/").unwrap()).unwrap();
        assert_eq!(
            client.clear_url(Province::Balochistan).unwrap().as_str(),
            "http://localhost:3000/api/clear-database?province=balochistan"
        );
    }

    #[test]
    fn dollar_rate_body_allows_missing_rate() {
        let body: DollarRateBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.rate, None);
        let body: DollarRateBody = serde_json::from_str(r#"{"rate": 280.5}"#).unwrap();
        assert_eq!(body.rate, Some(280.5));
    }
}
