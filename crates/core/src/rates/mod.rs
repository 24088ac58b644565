//! BCV rate module - quote model, provider trait and fallback resolver.

mod rate_errors;
mod rate_model;
mod rate_service;
mod rate_traits;

pub use rate_errors::RateError;
pub use rate_model::{RateQuote, RateSettings};
pub use rate_service::RateResolver;
pub use rate_traits::{RateProvider, RateResolverTrait};
