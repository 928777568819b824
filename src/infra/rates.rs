//! Client for the remote rate backend.
//!
//! - `GET /{province}-rates` returns the flat record list.
//! - `POST /upload-rates` ingests a spreadsheet.
//! - `DELETE /clear-database` wipes one province.
//!
//! Nothing here retries; callers decide what to show on failure.

use std::path::Path;

use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, StatusCode, Url,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use super::{remote_message, USER_AGENT};
use crate::domain::{Province, RateRecord, RateSnapshot, UploadFileType};

#[derive(Debug, Error)]
pub enum RatesClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{}", describe_remote(.status, .detail))]
    Remote {
        status: StatusCode,
        detail: Option<String>,
    },
}

fn describe_remote(status: &StatusCode, detail: &Option<String>) -> String {
    detail
        .clone()
        .unwrap_or_else(|| format!("rate backend answered HTTP {status}"))
}

#[derive(Debug, Deserialize)]
struct RatesEnvelope {
    #[serde(default)]
    data: Vec<RateRecord>,
}

/// Spreadsheet submission for `upload-rates`.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub file_type: UploadFileType,
    pub student: bool,
    pub sheet: u32,
}

impl UploadRequest {
    pub async fn from_path(
        path: impl AsRef<Path>,
        file_type: UploadFileType,
        student: bool,
        sheet: u32,
    ) -> Result<Self, RatesClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| RatesClientError::File {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rates.xlsx".to_string());
        Ok(Self {
            file_name,
            bytes,
            file_type,
            student,
            sheet,
        })
    }

    fn into_form(self) -> Form {
        Form::new()
            .part("file", Part::bytes(self.bytes).file_name(self.file_name))
            .text("file_type", self.file_type.as_str())
            .text("student", self.student.to_string())
            .text("sheet", self.sheet.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub skipped_rows: Option<Value>,
}

impl UploadOutcome {
    /// Number of rows the backend skipped, whether it sent a count or a list.
    pub fn skipped_count(&self) -> usize {
        match &self.skipped_rows {
            Some(Value::Array(rows)) => rows.len(),
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as usize,
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ClearOutcome {
    #[serde(default)]
    pub message: String,
}

#[derive(Clone)]
pub struct RatesClient {
    http: Client,
    base_url: Url,
}

impl RatesClient {
    pub fn new(base_url: Url) -> Result<Self, RatesClientError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, base_url })
    }

    pub fn rates_url(&self, province: Province) -> Result<Url, url::ParseError> {
        self.url(&format!("{}-rates", province.slug()))
    }

    pub fn clear_url(&self, province: Province) -> Result<Url, url::ParseError> {
        let mut url = self.url("clear-database")?;
        url.query_pairs_mut().append_pair("province", province.slug());
        Ok(url)
    }

    pub async fn get_rates(&self, province: Province) -> Result<Vec<RateRecord>, RatesClientError> {
        let url = self.rates_url(province)?;
        debug!("Requesting rate records from {url}");
        let envelope: RatesEnvelope = self.fetch_json(self.http.get(url)).await?;
        info!(
            "Fetched {} rate records for {province}",
            envelope.data.len()
        );
        Ok(envelope.data)
    }

    pub async fn upload_rates(
        &self,
        request: UploadRequest,
    ) -> Result<UploadOutcome, RatesClientError> {
        let url = self.url("upload-rates")?;
        info!(
            "Uploading {} ({} bytes) as {}",
            request.file_name,
            request.bytes.len(),
            request.file_type.as_str()
        );
        let outcome: UploadOutcome = self
            .fetch_json(self.http.post(url).multipart(request.into_form()))
            .await?;
        if outcome.skipped_count() > 0 {
            warn!("Backend skipped {} rows", outcome.skipped_count());
        }
        Ok(outcome)
    }

    pub async fn clear_database(
        &self,
        province: Province,
    ) -> Result<ClearOutcome, RatesClientError> {
        let url = self.clear_url(province)?;
        warn!("Clearing remote rate database for {province}");
        self.fetch_json(self.http.delete(url)).await
    }

    async fn fetch_json<T>(&self, builder: RequestBuilder) -> Result<T, RatesClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(RatesClientError::Remote {
            status,
            detail: remote_message(&body),
        })
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

/// Loads a fresh snapshot, falling back to an empty one on any failure.
pub async fn load_snapshot(client: &RatesClient, province: Province) -> RateSnapshot {
    match client.get_rates(province).await {
        Ok(records) => RateSnapshot::from_records(&records).with_loaded_at(now()),
        Err(err) => {
            error!("Failed to fetch or parse shipping rates for {province}: {err}");
            RateSnapshot::default()
        }
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client() -> RatesClient {
        RatesClient::new(Url::parse("https://rates.example.com/v1/").unwrap()).unwrap()
    }

    #[test]
    fn builds_province_urls() {
        let client = client();
        assert_eq!(
            client.rates_url(Province::Punjab).unwrap().as_str(),
            "https://rates.example.com/v1/punjab-rates"
        );
        assert_eq!(
            client.clear_url(Province::Sindh).unwrap().as_str(),
            "https://rates.example.com/v1/clear-database?province=sindh"
        );
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let envelope: RatesEnvelope = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.data.is_empty());

        let envelope: RatesEnvelope = serde_json::from_value(json!({
            "data": [{ "Country": "UAE", "Weight": 0.5, "Type": "docs", "Retail Rate": 10 }]
        }))
        .unwrap();
        assert_eq!(envelope.data.len(), 1);
    }

    #[test]
    fn null_fields_do_not_discard_the_good_rows() {
        let envelope: RatesEnvelope = serde_json::from_value(json!({
            "data": [
                { "Country": "UAE", "Weight": 0.5, "Type": "docs", "Retail Rate": 10 },
                { "Country": null, "Type": "sur-charges", "Surcharges": 3 },
                { "Country": "UK", "Weight": 1, "Type": null, "Retail Rate": 8 }
            ]
        }))
        .unwrap();
        assert_eq!(envelope.data.len(), 3);

        let snapshot = RateSnapshot::from_records(&envelope.data);
        assert_eq!(snapshot.countries, vec!["UAE", "UK"]);
        assert_eq!(snapshot.docs.len(), 1);
        assert!(snapshot.surcharges.is_empty());
    }

    #[test]
    fn skipped_rows_accepts_lists_and_counts() {
        let listed: UploadOutcome = serde_json::from_value(json!({
            "message": "ok",
            "skipped_rows": [3, 9]
        }))
        .unwrap();
        assert_eq!(listed.skipped_count(), 2);

        let counted: UploadOutcome =
            serde_json::from_value(json!({ "message": "ok", "skipped_rows": 4 })).unwrap();
        assert_eq!(counted.skipped_count(), 4);

        let none: UploadOutcome = serde_json::from_value(json!({ "message": "ok" })).unwrap();
        assert_eq!(none.skipped_count(), 0);
    }

    #[test]
    fn remote_error_prefers_backend_detail() {
        let with_detail = RatesClientError::Remote {
            status: StatusCode::BAD_REQUEST,
            detail: Some("Unsupported sheet".into()),
        };
        assert_eq!(with_detail.to_string(), "Unsupported sheet");

        let bare = RatesClientError::Remote {
            status: StatusCode::BAD_GATEWAY,
            detail: None,
        };
        assert_eq!(bare.to_string(), "rate backend answered HTTP 502 Bad Gateway");
    }

    #[tokio::test]
    async fn upload_from_missing_path_reports_file_error() {
        let err = UploadRequest::from_path(
            "/definitely/not/here.xlsx",
            UploadFileType::Retail,
            false,
            0,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RatesClientError::File { .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_yields_empty_snapshot() {
        let client = RatesClient::new(Url::parse("http://127.0.0.1:9/").unwrap()).unwrap();
        let snapshot = load_snapshot(&client, Province::Sindh).await;
        assert!(snapshot.is_empty());
        assert!(snapshot.countries.is_empty());
    }
}
