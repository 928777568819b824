use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{error::ApiError, state::GatewayState};
use crate::domain::Province;

#[derive(Debug, Serialize, PartialEq)]
pub struct DollarRate {
    pub rate: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Cleared {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearParams {
    province: Option<String>,
}

pub async fn dollar_rate_handler(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<DollarRate>, ApiError> {
    let rate = state.exchange.dollar_rate().await?;
    info!("Served dollar rate {rate}");
    Ok(Json(DollarRate { rate }))
}

pub async fn clear_database_handler(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<ClearParams>,
) -> Result<Json<Cleared>, ApiError> {
    let province = resolve_province(params.province.as_deref(), state.config.default_province)?;
    let outcome = state.rates.clear_database(province).await?;
    let message = if outcome.message.is_empty() {
        format!("Cleared {} rates", province.label())
    } else {
        outcome.message
    };
    info!("Cleared remote rates for {province}");
    Ok(Json(Cleared { message }))
}

fn resolve_province(raw: Option<&str>, fallback: Province) -> Result<Province, ApiError> {
    match raw.map(str::trim).filter(|slug| !slug.is_empty()) {
        Some(slug) => {
            Province::from_slug(slug).ok_or_else(|| ApiError::UnknownProvince(slug.to_string()))
        }
        None => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    fn unreachable_state() -> Arc<GatewayState> {
        let config = AppConfig::from_lookup(|key| match key {
            "RATES_API_URL" | "EXCHANGE_API_URL" => Some("http://127.0.0.1:9/".to_string()),
            _ => None,
        })
        .unwrap();
        GatewayState::new(config).unwrap()
    }

    #[test]
    fn province_defaults_when_absent() {
        assert_eq!(resolve_province(None, Province::Punjab).unwrap(), Province::Punjab);
        assert_eq!(resolve_province(Some("  "), Province::Sindh).unwrap(), Province::Sindh);
        assert_eq!(
            resolve_province(Some("balochistan"), Province::Sindh).unwrap(),
            Province::Balochistan
        );
    }

    #[test]
    fn unknown_province_is_bad_request() {
        let err = resolve_province(Some("gilgit"), Province::Sindh).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unreachable_exchange_is_internal_error() {
        let err = dollar_rate_handler(State(unreachable_state()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[tokio::test]
    async fn unreachable_backend_fails_clear() {
        let err = clear_database_handler(
            State(unreachable_state()),
            Query(ClearParams {
                province: Some("sindh".into()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Server error while clearing database");
    }
}
