//! Runtime configuration.
//!
//! Every remote endpoint is configured here; nothing else in the crate hard-codes
//! a host. Values come from the environment, secrets may also be mounted as files
//! under `/run/secrets/<NAME>`.

use std::{env, fmt::Display, fs::read_to_string, path::Path, str::FromStr};

use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::Province;

pub const RATES_API_URL: &str = "RATES_API_URL";
pub const RATES_GATEWAY_URL: &str = "RATES_GATEWAY_URL";
pub const EXCHANGE_API_URL: &str = "EXCHANGE_API_URL";
pub const EXCHANGE_RATE_API_KEY: &str = "EXCHANGE_RATE_API_KEY";
pub const RATES_GATEWAY_PORT: &str = "RATES_GATEWAY_PORT";
pub const RATES_ADMIN_KEY: &str = "RATES_ADMIN_KEY";
pub const RATES_DEFAULT_PROVINCE: &str = "RATES_DEFAULT_PROVINCE";

const DEFAULT_RATES_API_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000/";
const DEFAULT_EXCHANGE_API_URL: &str = "https://api.apilayer.com/exchangerates_data/";
const DEFAULT_GATEWAY_PORT: &str = "3000";

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
    #[error("invalid URL in {key}: {source}")]
    Url {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub rates_api_url: Url,
    pub gateway_url: Url,
    pub exchange_api_url: Url,
    pub exchange_api_key: String,
    pub gateway_port: u16,
    pub admin_key: Option<String>,
    pub default_province: Province,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| var(key).or_else(|| read_secret(Path::new(SECRETS_DIR), key)))
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_province = match lookup(RATES_DEFAULT_PROVINCE) {
            Some(raw) => Province::from_slug(&raw).ok_or_else(|| ConfigError::Invalid {
                key: RATES_DEFAULT_PROVINCE,
                message: format!("unknown province {raw:?}"),
            })?,
            None => Province::default(),
        };

        Ok(Self {
            rates_api_url: load_url(&lookup, RATES_API_URL, DEFAULT_RATES_API_URL)?,
            gateway_url: load_url(&lookup, RATES_GATEWAY_URL, DEFAULT_GATEWAY_URL)?,
            exchange_api_url: load_url(&lookup, EXCHANGE_API_URL, DEFAULT_EXCHANGE_API_URL)?,
            exchange_api_key: lookup(EXCHANGE_RATE_API_KEY).unwrap_or_else(|| {
                warn!("{EXCHANGE_RATE_API_KEY} not set; exchange rate lookups will be rejected");
                String::new()
            }),
            gateway_port: try_load(&lookup, RATES_GATEWAY_PORT, DEFAULT_GATEWAY_PORT)?,
            admin_key: lookup(RATES_ADMIN_KEY).filter(|key| !key.trim().is_empty()),
            default_province,
        })
    }

    pub fn admin_enabled(&self) -> bool {
        self.admin_key.is_some()
    }

    pub fn check_admin_key(&self, candidate: &str) -> bool {
        self.admin_key
            .as_deref()
            .map(|key| key == candidate.trim())
            .unwrap_or(false)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_secret(dir: &Path, secret_name: &str) -> Option<String> {
    let path = dir.join(secret_name);
    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| debug!("No secret file for {secret_name}: {e}"))
        .ok()
        .filter(|value| !value.is_empty())
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        })
}

/// Base URLs always end in `/` so `Url::join` appends instead of replacing.
fn load_url<F>(lookup: &F, key: &'static str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut raw: String = try_load(lookup, key, default)?;
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|source| ConfigError::Url { key, source })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use pretty_assertions::assert_eq;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.rates_api_url.as_str(), DEFAULT_RATES_API_URL);
        assert_eq!(config.gateway_port, 3000);
        assert_eq!(config.default_province, Province::Sindh);
        assert_eq!(config.admin_key, None);
        assert!(!config.admin_enabled());
    }

    #[test]
    fn base_urls_gain_a_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            RATES_API_URL,
            "https://rates.example.com/api",
        )]))
        .unwrap();
        assert_eq!(
            config.rates_api_url.join("sindh-rates").unwrap().as_str(),
            "https://rates.example.com/api/sindh-rates"
        );
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[(RATES_GATEWAY_PORT, "eighty")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: RATES_GATEWAY_PORT,
                ..
            }
        ));
    }

    #[test]
    fn invalid_url_is_reported() {
        let err =
            AppConfig::from_lookup(lookup_from(&[(EXCHANGE_API_URL, "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::Url { key: EXCHANGE_API_URL, .. }));
    }

    #[test]
    fn unknown_province_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(RATES_DEFAULT_PROVINCE, "kpk")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn admin_key_is_compared_trimmed() {
        let config =
            AppConfig::from_lookup(lookup_from(&[(RATES_ADMIN_KEY, "open-sesame")])).unwrap();
        assert!(config.check_admin_key(" open-sesame "));
        assert!(!config.check_admin_key("guess"));
    }

    #[test]
    fn missing_secret_file_is_none() {
        let dir = std::env::temp_dir().join("intl-rates-no-secrets");
        assert_eq!(read_secret(&dir, "NOPE"), None);
    }
}
