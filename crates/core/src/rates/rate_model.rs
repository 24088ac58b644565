use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::rate_errors::RateError;
use crate::constants::{
    CONFIGURED_RATE_SOURCE, DEFAULT_FALLBACK_RATE, DEFAULT_RATE_PRECISION, DEFAULT_RATE_UNIT,
};
use crate::utils::decimal_serde::lenient_decimal;

/// Daily BCV conversion rate as shown by the currency badge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    #[serde(deserialize_with = "lenient_decimal")]
    pub value: Decimal,
    pub unit: String,
    pub precision: u32,
    /// True when `value` is not a fresh live quote.
    pub is_fallback: bool,
    pub date: NaiveDate,
    pub source: String,
}

impl RateQuote {
    /// Returns this quote re-labelled as a fallback value.
    pub fn into_fallback(mut self) -> Self {
        self.is_fallback = true;
        self
    }

    /// Converts an amount in the quote's base currency to local currency,
    /// rounded half-up to the quote precision.
    ///
    /// A product outside the `Decimal` range saturates to `Decimal::MAX`
    /// or `Decimal::MIN` by sign.
    pub fn convert(&self, amount: Decimal) -> Decimal {
        match amount.checked_mul(self.value) {
            Some(product) => product
                .round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero),
            None => {
                log::warn!(
                    "Converting {} at rate {} overflows; saturating",
                    amount,
                    self.value
                );
                if amount.is_sign_negative() != self.value.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            }
        }
    }

    /// Value rendered with exactly `precision` decimals.
    pub fn display_value(&self) -> String {
        let rounded = self
            .value
            .round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*}", self.precision as usize, rounded)
    }

    pub fn is_usable(&self) -> bool {
        self.value > Decimal::ZERO
    }
}

/// Settings for the configured default quote.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSettings {
    pub fallback_value: Decimal,
    pub unit: String,
    pub precision: u32,
}

impl RateSettings {
    pub fn new(fallback_value: Decimal, unit: impl Into<String>, precision: u32) -> Result<Self, RateError> {
        if fallback_value <= Decimal::ZERO {
            return Err(RateError::InvalidSettings(format!(
                "fallback rate must be positive, got {}",
                fallback_value
            )));
        }
        Ok(Self {
            fallback_value,
            unit: unit.into(),
            precision,
        })
    }

    /// Builds the configured default quote dated today.
    pub fn default_quote(&self) -> RateQuote {
        RateQuote {
            value: self.fallback_value,
            unit: self.unit.clone(),
            precision: self.precision,
            is_fallback: true,
            date: Utc::now().date_naive(),
            source: CONFIGURED_RATE_SOURCE.to_string(),
        }
    }
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            fallback_value: Decimal::from_str(DEFAULT_FALLBACK_RATE).unwrap_or(Decimal::ONE),
            unit: DEFAULT_RATE_UNIT.to_string(),
            precision: DEFAULT_RATE_PRECISION,
        }
    }
}
