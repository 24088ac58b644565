use std::time::Duration;

use clinicdesk_core::rates::{RateQuote, RateSettings};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::errors::ClientError;
use crate::wire::{decode_list, decode_object, BcvRateResponse};

/// Paths of the consumed endpoints, relative to the backend base URL.
pub mod endpoints {
    pub const APPOINTMENTS_TODAY: &str = "appointments/today";
    pub const WAITING_ROOM_TODAY: &str = "waiting-room/today";
    pub const PAYMENTS_RECENT: &str = "payments/recent";
    pub const BCV_RATE: &str = "bcv-rate";
    pub const DASHBOARD_SUMMARY: &str = "dashboard/summary";
}

/// Default HTTP request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`ClinicBackendClient`].
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Passed through as `Authorization: Bearer <token>`.
    pub api_token: Option<String>,
    pub timeout: Duration,
    /// Unit and precision used when the rate payload omits them.
    pub rate_defaults: RateSettings,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
            rate_defaults: RateSettings::default(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rate_defaults(mut self, defaults: RateSettings) -> Self {
        self.rate_defaults = defaults;
        self
    }
}

/// HTTP client for the clinic REST backend.
///
/// One best-effort GET per call; retries are left to the next poll.
#[derive(Clone)]
pub struct ClinicBackendClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
    rate_defaults: RateSettings,
}

impl ClinicBackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(config.base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }
        // Url::join drops the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_token: config.api_token,
            rate_defaults: config.rate_defaults,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, ClientError> {
        let url = self.endpoint_url(endpoint)?;
        log::debug!("GET {}", url);

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(endpoint, e))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::decode(endpoint, e.to_string()))
    }

    /// GETs a list endpoint with lenient decoding.
    pub async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, ClientError> {
        let body = self.get_json(endpoint).await?;
        decode_list(endpoint, body)
    }

    pub async fn get_object<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let body = self.get_json(endpoint).await?;
        decode_object(endpoint, body)
    }

    pub async fn fetch_bcv_rate(&self) -> Result<RateQuote, ClientError> {
        let raw: BcvRateResponse = self.get_object(endpoints::BCV_RATE).await?;
        Ok(raw.into_quote(&self.rate_defaults))
    }
}

fn transport_error(endpoint: &str, err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        ClientError::Network(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = ClinicBackendClient::new(BackendConfig::new("http://clinic.local/api")).unwrap();
        assert_eq!(client.base_url().as_str(), "http://clinic.local/api/");
        assert_eq!(
            client.endpoint_url(endpoints::WAITING_ROOM_TODAY).unwrap().as_str(),
            "http://clinic.local/api/waiting-room/today"
        );
        assert_eq!(
            client.endpoint_url("/bcv-rate").unwrap().as_str(),
            "http://clinic.local/api/bcv-rate"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = ClinicBackendClient::new(BackendConfig::new("not a url"));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = BackendConfig::new("http://clinic.local").with_token(Some("  ".to_string()));
        assert!(config.api_token.is_none());
    }
}
