use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::rate_errors::RateError;
use super::rate_model::{RateQuote, RateSettings};
use super::rate_traits::{RateProvider, RateResolverTrait};
use crate::errors::{Error, Result};

/// Resolves the BCV rate, falling back to the last live quote or the
/// configured default when the provider fails.
#[derive(Clone)]
pub struct RateResolver {
    provider: Arc<dyn RateProvider>,
    settings: RateSettings,
    last_known: Arc<RwLock<Option<RateQuote>>>,
}

impl RateResolver {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self::with_settings(provider, RateSettings::default())
    }

    pub fn with_settings(provider: Arc<dyn RateProvider>, settings: RateSettings) -> Self {
        Self {
            provider,
            settings,
            last_known: Arc::new(RwLock::new(None)),
        }
    }

    pub fn settings(&self) -> &RateSettings {
        &self.settings
    }

    async fn fetch_live(&self) -> Result<RateQuote> {
        let quote = self.provider.fetch_rate().await?;
        if !quote.is_usable() {
            return Err(Error::Rate(RateError::InvalidValue(format!(
                "provider returned non-positive rate {}",
                quote.value
            ))));
        }
        Ok(quote)
    }

    fn remember(&self, quote: &RateQuote) {
        match self.last_known.write() {
            Ok(mut slot) => *slot = Some(quote.clone()),
            Err(e) => log::warn!("Could not cache BCV quote: {}", e),
        }
    }

    fn fallback_quote(&self) -> RateQuote {
        match self.last_known() {
            Some(last) => last.into_fallback(),
            None => self.settings.default_quote(),
        }
    }
}

#[async_trait]
impl RateResolverTrait for RateResolver {
    async fn get_rate(&self) -> RateQuote {
        match self.fetch_live().await {
            Ok(quote) => {
                // Upstream fallbacks are passed through but never become "last known".
                if !quote.is_fallback {
                    self.remember(&quote);
                }
                quote
            }
            Err(e) => {
                let fallback = self.fallback_quote();
                log::warn!(
                    "BCV rate unavailable ({}). Using fallback {} from {}",
                    e,
                    fallback.value,
                    fallback.source
                );
                fallback
            }
        }
    }

    fn last_known(&self) -> Option<RateQuote> {
        self.last_known.read().ok().and_then(|slot| slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CONFIGURED_RATE_SOURCE;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Provider that replays a script of responses, then keeps failing.
    struct ScriptedProvider {
        responses: Mutex<Vec<Result<RateQuote>>>,
    }

    impl ScriptedProvider {
        fn new(mut responses: Vec<Result<RateQuote>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl RateProvider for ScriptedProvider {
        async fn fetch_rate(&self) -> Result<RateQuote> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(Error::Backend("connection refused".to_string())))
        }
    }

    fn live(value: Decimal) -> RateQuote {
        RateQuote {
            value,
            unit: "VES/USD".to_string(),
            precision: 4,
            is_fallback: false,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            source: "BCV".to_string(),
        }
    }

    #[tokio::test]
    async fn test_provider_error_yields_configured_fallback() {
        let resolver = RateResolver::new(Arc::new(ScriptedProvider::new(vec![])));
        let quote = resolver.get_rate().await;
        assert!(quote.is_fallback);
        assert!(quote.value > Decimal::ZERO);
        assert_eq!(quote.source, CONFIGURED_RATE_SOURCE);
    }

    #[tokio::test]
    async fn test_live_quote_is_returned_and_remembered() {
        let resolver = RateResolver::new(Arc::new(ScriptedProvider::new(vec![Ok(live(dec!(36.7)))])));
        let quote = resolver.get_rate().await;
        assert!(!quote.is_fallback);
        assert_eq!(quote.value, dec!(36.7));
        assert_eq!(resolver.last_known(), Some(live(dec!(36.7))));
    }

    #[tokio::test]
    async fn test_fallback_prefers_last_known_live_value() {
        let resolver = RateResolver::new(Arc::new(ScriptedProvider::new(vec![
            Ok(live(dec!(37.1))),
            Err(Error::Backend("timeout".to_string())),
        ])));
        resolver.get_rate().await;
        let quote = resolver.get_rate().await;
        assert!(quote.is_fallback);
        assert_eq!(quote.value, dec!(37.1));
        assert_eq!(quote.source, "BCV");
    }

    #[tokio::test]
    async fn test_non_positive_live_value_is_rejected() {
        let settings = RateSettings::new(dec!(40), "VES/USD", 2).unwrap();
        let resolver = RateResolver::with_settings(
            Arc::new(ScriptedProvider::new(vec![Ok(live(Decimal::ZERO))])),
            settings,
        );
        let quote = resolver.get_rate().await;
        assert!(quote.is_fallback);
        assert_eq!(quote.value, dec!(40));
        assert!(resolver.last_known().is_none());
    }

    #[tokio::test]
    async fn test_upstream_fallback_is_not_remembered() {
        let resolver = RateResolver::new(Arc::new(ScriptedProvider::new(vec![Ok(
            live(dec!(35)).into_fallback(),
        )])));
        let quote = resolver.get_rate().await;
        assert!(quote.is_fallback);
        assert_eq!(quote.value, dec!(35));
        assert!(resolver.last_known().is_none());
    }
}
