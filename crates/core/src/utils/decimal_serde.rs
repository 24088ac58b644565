//! Lenient decimal deserializers.
//!
//! The backend serializes money as JSON strings (`"20.00"`) on some
//! endpoints and as numbers on others. These helpers accept both, plus
//! `null`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn decimal_from_value<E: serde::de::Error>(value: Value) -> Result<Option<Decimal>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Some)
                .map_err(|e| E::custom(format!("invalid decimal '{}': {}", s, e)))
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(Decimal::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Some(Decimal::from(u)))
            } else {
                let f = n
                    .as_f64()
                    .ok_or_else(|| E::custom(format!("invalid decimal number {}", n)))?;
                Decimal::try_from(f)
                    .map(Some)
                    .map_err(|e| E::custom(format!("invalid decimal number {}: {}", n, e)))
            }
        }
        other => Err(E::custom(format!("expected decimal, found {}", other))),
    }
}

/// Deserializes a decimal from a string, number or null (null becomes zero).
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(value)?.unwrap_or(Decimal::ZERO))
}

/// Deserializes an optional decimal from a string, number or null.
pub fn lenient_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decimal_from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Deserialize)]
    struct Amounts {
        #[serde(deserialize_with = "lenient_decimal")]
        total: Decimal,
        #[serde(default, deserialize_with = "lenient_optional_decimal")]
        extra: Option<Decimal>,
    }

    #[test]
    fn test_accepts_strings_and_numbers() {
        let a: Amounts = serde_json::from_str(r#"{"total": "20.50", "extra": 3}"#).unwrap();
        assert_eq!(a.total, dec!(20.50));
        assert_eq!(a.extra, Some(dec!(3)));

        let b: Amounts = serde_json::from_str(r#"{"total": 12.25}"#).unwrap();
        assert_eq!(b.total, dec!(12.25));
        assert_eq!(b.extra, None);
    }

    #[test]
    fn test_null_total_is_zero() {
        let a: Amounts = serde_json::from_str(r#"{"total": null, "extra": ""}"#).unwrap();
        assert_eq!(a.total, Decimal::ZERO);
        assert_eq!(a.extra, None);
    }

    #[test]
    fn test_rejects_non_numeric() {
        let result: Result<Amounts, _> = serde_json::from_str(r#"{"total": "abc"}"#);
        assert!(result.is_err());
        let result: Result<Amounts, _> = serde_json::from_str(r#"{"total": true}"#);
        assert!(result.is_err());
    }
}
