use async_trait::async_trait;

use super::rate_model::RateQuote;
use crate::errors::Result;

/// Source of live BCV quotes (the `/bcv-rate` endpoint).
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self) -> Result<RateQuote>;
}

/// Contract for resolving a rate that is always usable.
#[async_trait]
pub trait RateResolverTrait: Send + Sync {
    /// Never fails: provider errors yield a quote with `is_fallback = true`.
    async fn get_rate(&self) -> RateQuote;

    /// Last live quote seen, if any.
    fn last_known(&self) -> Option<RateQuote>;
}
