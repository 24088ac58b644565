//! Dashboard domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rates::RateQuote;
use crate::utils::decimal_serde::lenient_decimal;

/// A single point of a trend series as sent by `/dashboard/summary`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    /// ISO date (or month) label of this point
    pub date: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub value: Decimal,
}

impl TrendPoint {
    pub fn new(date: impl Into<String>, value: Decimal) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// Raw aggregate payload of `/dashboard/summary`.
///
/// Missing counts and totals default to zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DashboardSummary {
    pub total_patients: u64,
    pub total_appointments: u64,
    pub completed_appointments: u64,
    pub pending_appointments: u64,
    pub total_payments: u64,
    /// Number of audit-log events recorded
    pub total_events: u64,
    /// Number of consultations exempted from payment
    pub total_waived: u64,
    #[serde(deserialize_with = "lenient_decimal")]
    pub total_amount_confirmed: Decimal,
    /// Outstanding balance; negative when patients hold credit
    #[serde(deserialize_with = "lenient_decimal")]
    pub financial_balance: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub estimated_waived_amount: Decimal,
    pub appointments_trend: Vec<TrendPoint>,
    pub payments_trend: Vec<TrendPoint>,
    pub balance_trend: Vec<TrendPoint>,
}

/// One date of the combined trend chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    pub date: String,
    pub appointments: Decimal,
    pub payments: Decimal,
    pub balance: Decimal,
}

/// Local-currency equivalents of the money figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalAmounts {
    pub confirmed_amount: Decimal,
    pub pending_amount: Decimal,
    pub total_billed: Decimal,
    pub waived_amount: Decimal,
}

/// Display-ready dashboard view model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub total_patients: u64,
    pub total_appointments: u64,
    pub completed_appointments: u64,
    pub pending_appointments: u64,
    pub total_payments: u64,
    pub total_events: u64,
    pub confirmed_amount: Decimal,
    /// Outstanding balance, never negative
    pub pending_amount: Decimal,
    /// Credit held by patients when the balance is negative
    pub credit_amount: Decimal,
    /// Confirmed plus pending
    pub total_billed: Decimal,
    pub waived_count: u64,
    pub waived_amount: Decimal,
    pub trend: Vec<TrendRow>,
    /// False when the upstream series had to be re-aligned by date
    pub trends_aligned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<RateQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalAmounts>,
}

impl DashboardView {
    /// Attaches the BCV quote and the local-currency equivalents.
    pub fn with_rate(mut self, rate: &RateQuote) -> Self {
        self.local = Some(LocalAmounts {
            confirmed_amount: rate.convert(self.confirmed_amount),
            pending_amount: rate.convert(self.pending_amount),
            total_billed: rate.convert(self.total_billed),
            waived_amount: rate.convert(self.waived_amount),
        });
        self.rate = Some(rate.clone());
        self
    }
}
