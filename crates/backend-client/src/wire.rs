//! Wire formats of the clinic backend and their lenient decoding.

use chrono::{NaiveDate, Utc};
use clinicdesk_core::rates::{RateQuote, RateSettings};
use clinicdesk_core::utils::decimal_serde::lenient_decimal;
use clinicdesk_core::utils::time_utils::parse_timestamp;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ClientError;

/// Source label used when the rate payload does not name one.
pub const BCV_SOURCE: &str = "BCV";

/// Decodes a list endpoint body.
///
/// Accepts a bare array or a paginated object with a `results` array.
/// Items that fail to decode are logged and skipped.
pub fn decode_list<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<Vec<T>, ClientError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ClientError::decode(
                    endpoint,
                    "expected an array or an object with a `results` array",
                ))
            }
        },
        other => {
            return Err(ClientError::decode(
                endpoint,
                format!("expected an array, found {}", json_kind(&other)),
            ))
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed item #{} from {}: {}", index, endpoint, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        log::debug!("{}: decoded {} of {} items", endpoint, decoded.len(), total);
    }
    Ok(decoded)
}

/// Decodes a single-object endpoint body.
pub fn decode_object<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<T, ClientError> {
    serde_json::from_value(body).map_err(|e| ClientError::decode(endpoint, e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Payload of `GET /bcv-rate`.
///
/// Only the value is required; the rest falls back to configured defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct BcvRateResponse {
    #[serde(alias = "rate", deserialize_with = "lenient_decimal")]
    pub value: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, alias = "isFallback")]
    pub is_fallback: bool,
}

impl BcvRateResponse {
    pub fn into_quote(self, defaults: &RateSettings) -> RateQuote {
        let date = self
            .date
            .as_deref()
            .and_then(parse_quote_date)
            .unwrap_or_else(|| Utc::now().date_naive());

        RateQuote {
            value: self.value,
            unit: self
                .unit
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| defaults.unit.clone()),
            precision: self.precision.unwrap_or(defaults.precision),
            is_fallback: self.is_fallback,
            date,
            source: self
                .source
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| BCV_SOURCE.to_string()),
        }
    }
}

fn parse_quote_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicdesk_core::sources::{AppointmentSummary, PaymentStatus, PaymentSummary};
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decode_bare_array() {
        let body = json!([{"id": 1, "patient": "Ana", "appointment_date": "2024-01-02T10:00:00"}]);
        let items: Vec<AppointmentSummary> = decode_list("appointments/today", body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
    }

    #[test]
    fn test_decode_paginated_results_and_skip_bad_items() {
        let body = json!({
            "count": 3,
            "next": null,
            "results": [
                {"id": 1, "date": "2024-01-02"},
                {"patient": "missing id"},
                {"id": 3}
            ]
        });
        let items: Vec<AppointmentSummary> = decode_list("appointments/today", body).unwrap();
        let ids: Vec<i64> = items.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_decode_keeps_payment_with_null_status() {
        let body = json!([
            {"id": 9, "charge_order": 5, "status": null, "amount": "20.00"},
            {"id": 10, "status": "confirmed"}
        ]);
        let items: Vec<PaymentSummary> = decode_list("payments/recent", body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].payment_status(), PaymentStatus::Other(String::new()));
        assert_eq!(items[1].payment_status(), PaymentStatus::Confirmed);
    }

    #[test]
    fn test_decode_rejects_non_list_body() {
        let err = decode_list::<AppointmentSummary>("appointments/today", json!({"detail": "x"}))
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));

        let err = decode_list::<AppointmentSummary>("appointments/today", json!("oops")).unwrap_err();
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_rate_payload_with_string_value_and_defaults() {
        let raw: BcvRateResponse = decode_object("bcv-rate", json!({"rate": "36.1234"})).unwrap();
        let quote = raw.into_quote(&RateSettings::default());
        assert_eq!(quote.value, dec!(36.1234));
        assert_eq!(quote.unit, "VES/USD");
        assert_eq!(quote.precision, 4);
        assert_eq!(quote.source, BCV_SOURCE);
        assert!(!quote.is_fallback);
        assert_eq!(quote.date, Utc::now().date_naive());
    }

    #[test]
    fn test_rate_payload_full() {
        let raw: BcvRateResponse = decode_object(
            "bcv-rate",
            json!({
                "value": 40.5,
                "unit": "Bs/USD",
                "precision": 2,
                "date": "2024-03-01T08:00:00Z",
                "source": "BCV-cache",
                "is_fallback": true
            }),
        )
        .unwrap();
        let quote = raw.into_quote(&RateSettings::default());
        assert_eq!(quote.value, dec!(40.5));
        assert_eq!(quote.unit, "Bs/USD");
        assert_eq!(quote.precision, 2);
        assert_eq!(quote.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(quote.is_fallback);
    }

    #[test]
    fn test_rate_payload_without_value_fails() {
        let result = decode_object::<BcvRateResponse>("bcv-rate", json!({"unit": "VES/USD"}));
        assert!(matches!(result, Err(ClientError::Decode { .. })));
    }
}
