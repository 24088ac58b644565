use thiserror::Error;

/// Errors raised while obtaining a live BCV quote.
///
/// These never reach callers of [`RateResolver::get_rate`](super::RateResolver);
/// the resolver converts them into a fallback quote.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("Rate provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Invalid rate value: {0}")]
    InvalidValue(String),

    #[error("Invalid rate configuration: {0}")]
    InvalidSettings(String),
}
