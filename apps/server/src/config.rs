use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use clinicdesk_core::constants::{
    DEFAULT_FALLBACK_RATE, DEFAULT_RATE_PRECISION, DEFAULT_RATE_UNIT, FAST_REFRESH_INTERVAL,
    SLOW_REFRESH_INTERVAL,
};
use clinicdesk_core::rates::RateSettings;
use rust_decimal::Decimal;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub backend_url: String,
    pub api_token: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub backend_timeout: Duration,
    pub rate: RateSettings,
    /// Period of the waiting room and appointment pollers
    pub fast_refresh: Duration,
    /// Period of the dashboard, notification and rate pollers
    pub slow_refresh: Duration,
}

impl Config {
    /// Loads `.env` (if present) and reads the `CD_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let listen_addr: SocketAddr = get("CD_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid CD_LISTEN_ADDR")?;
        let backend_url =
            get("CD_BACKEND_URL").unwrap_or_else(|| "http://127.0.0.1:8000/api".to_string());
        let api_token = get("CD_API_TOKEN");
        let cors_allow = get("CD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout = Duration::from_millis(parse_or(&get, "CD_REQUEST_TIMEOUT_MS", 30_000)?);
        let backend_timeout = Duration::from_millis(parse_or(&get, "CD_BACKEND_TIMEOUT_MS", 10_000)?);

        let fallback_value = get("CD_FALLBACK_RATE").unwrap_or_else(|| DEFAULT_FALLBACK_RATE.to_string());
        let fallback_value = Decimal::from_str(&fallback_value)
            .with_context(|| format!("Invalid CD_FALLBACK_RATE '{}'", fallback_value))?;
        let unit = get("CD_RATE_UNIT").unwrap_or_else(|| DEFAULT_RATE_UNIT.to_string());
        let precision = parse_or(&get, "CD_RATE_PRECISION", DEFAULT_RATE_PRECISION)?;
        let rate = RateSettings::new(fallback_value, unit, precision).context("Invalid rate settings")?;

        let fast_refresh = Duration::from_secs(parse_or(
            &get,
            "CD_FAST_REFRESH_SECS",
            FAST_REFRESH_INTERVAL.as_secs(),
        )?);
        let slow_refresh = Duration::from_secs(parse_or(
            &get,
            "CD_SLOW_REFRESH_SECS",
            SLOW_REFRESH_INTERVAL.as_secs(),
        )?);
        if fast_refresh.is_zero() || slow_refresh.is_zero() {
            return Err(anyhow!("Refresh intervals must be at least one second"));
        }

        Ok(Self {
            listen_addr,
            backend_url,
            api_token,
            cors_allow,
            request_timeout,
            backend_timeout,
            rate,
            fast_refresh,
            slow_refresh,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid {} '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.backend_url, "http://127.0.0.1:8000/api");
        assert!(config.api_token.is_none());
        assert_eq!(config.cors_allow, vec!["*".to_string()]);
        assert_eq!(config.fast_refresh, Duration::from_secs(20));
        assert_eq!(config.slow_refresh, Duration::from_secs(60));
        assert_eq!(config.rate, RateSettings::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("CD_CORS_ALLOW_ORIGINS", "http://a.test, http://b.test"),
            ("CD_API_TOKEN", "tok"),
            ("CD_FALLBACK_RATE", "40.25"),
            ("CD_RATE_PRECISION", "2"),
            ("CD_BACKEND_TIMEOUT_MS", "500"),
        ])
        .unwrap();
        assert_eq!(config.cors_allow.len(), 2);
        assert_eq!(config.api_token.as_deref(), Some("tok"));
        assert_eq!(config.rate.fallback_value, Decimal::new(4025, 2));
        assert_eq!(config.rate.precision, 2);
        assert_eq!(config.backend_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_with(&[("CD_LISTEN_ADDR", "nowhere")]).is_err());
        assert!(config_with(&[("CD_FALLBACK_RATE", "abc")]).is_err());
        assert!(config_with(&[("CD_FALLBACK_RATE", "-1")]).is_err());
        assert!(config_with(&[("CD_FAST_REFRESH_SECS", "0")]).is_err());
        assert!(config_with(&[("CD_REQUEST_TIMEOUT_MS", "soon")]).is_err());
    }
}
