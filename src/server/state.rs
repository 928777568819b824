use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::AppConfig,
    infra::{
        exchange::{ExchangeClient, ExchangeError},
        rates::{RatesClient, RatesClientError},
    },
};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("exchange client: {0}")]
    Exchange(#[from] ExchangeError),
    #[error("rates client: {0}")]
    Rates(#[from] RatesClientError),
}

pub struct GatewayState {
    pub config: AppConfig,
    pub exchange: ExchangeClient,
    pub rates: RatesClient,
}

impl GatewayState {
    pub fn new(config: AppConfig) -> Result<Arc<Self>, StateError> {
        let exchange =
            ExchangeClient::new(config.exchange_api_url.clone(), config.exchange_api_key.clone())?;
        let rates = RatesClient::new(config.rates_api_url.clone())?;
        Ok(Arc::new(Self {
            config,
            exchange,
            rates,
        }))
    }
}
