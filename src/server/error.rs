use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::infra::{exchange::ExchangeError, rates::RatesClientError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch exchange rate")]
    ExchangeUpstream(StatusCode),

    #[error("Failed to fetch exchange rate")]
    ExchangeMissingRate,

    #[error("Internal Server Error")]
    ExchangeInternal,

    #[error("{}", .detail.as_deref().unwrap_or("Failed to clear"))]
    ClearRemote {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("Server error while clearing database")]
    ClearInternal,

    #[error("Unknown province: {0}")]
    UnknownProvince(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ExchangeUpstream(status) => *status,
            ApiError::ExchangeMissingRate => StatusCode::BAD_GATEWAY,
            ApiError::ClearRemote { status, .. } => *status,
            ApiError::UnknownProvince(_) => StatusCode::BAD_REQUEST,
            ApiError::ExchangeInternal | ApiError::ClearInternal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        error!("Exchange rate lookup failed: {err}");
        match err {
            ExchangeError::Upstream(status) => ApiError::ExchangeUpstream(status),
            ExchangeError::MissingRate => ApiError::ExchangeMissingRate,
            ExchangeError::InvalidUrl(_) | ExchangeError::Http(_) => ApiError::ExchangeInternal,
        }
    }
}

impl From<RatesClientError> for ApiError {
    fn from(err: RatesClientError) -> Self {
        error!("Clearing rate database failed: {err}");
        match err {
            RatesClientError::Remote { status, detail } => ApiError::ClearRemote { status, detail },
            _ => ApiError::ClearInternal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
