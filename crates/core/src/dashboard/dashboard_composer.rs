use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::dashboard_model::{DashboardSummary, DashboardView, TrendPoint, TrendRow};

/// Builds the display view model from the raw summary payload.
///
/// - pending amount is `max(financial_balance, 0)`
/// - credit amount is `max(-financial_balance, 0)`
/// - total billed is confirmed plus pending, saturating at the `Decimal` bounds
/// - trend series are zipped, or re-aligned by date when they diverge
pub fn compose_summary(raw: DashboardSummary) -> DashboardView {
    let pending_amount = raw.financial_balance.max(Decimal::ZERO);
    let credit_amount = (-raw.financial_balance).max(Decimal::ZERO);
    let (trend, trends_aligned) = align_trends(
        &raw.appointments_trend,
        &raw.payments_trend,
        &raw.balance_trend,
    );

    DashboardView {
        total_patients: raw.total_patients,
        total_appointments: raw.total_appointments,
        completed_appointments: raw.completed_appointments,
        pending_appointments: raw.pending_appointments,
        total_payments: raw.total_payments,
        total_events: raw.total_events,
        confirmed_amount: raw.total_amount_confirmed,
        pending_amount,
        credit_amount,
        total_billed: raw.total_amount_confirmed.saturating_add(pending_amount),
        waived_count: raw.total_waived,
        waived_amount: raw.estimated_waived_amount,
        trend,
        trends_aligned,
        rate: None,
        local: None,
    }
}

fn empty_row(date: &str) -> TrendRow {
    TrendRow {
        date: date.to_string(),
        appointments: Decimal::ZERO,
        payments: Decimal::ZERO,
        balance: Decimal::ZERO,
    }
}

fn same_dates(a: &[TrendPoint], b: &[TrendPoint]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.date == y.date)
}

/// Combines the three trend series into rows.
///
/// Returns `(rows, true)` when the series share the same ordered dates.
/// Otherwise rows cover the union of dates in ascending order, with zero
/// for a series that has no point on a date, and the flag is `false`.
/// Within one series a repeated date keeps its last value.
pub fn align_trends(
    appointments: &[TrendPoint],
    payments: &[TrendPoint],
    balance: &[TrendPoint],
) -> (Vec<TrendRow>, bool) {
    if same_dates(appointments, payments) && same_dates(appointments, balance) {
        let rows = appointments
            .iter()
            .zip(payments)
            .zip(balance)
            .map(|((a, p), b)| TrendRow {
                date: a.date.clone(),
                appointments: a.value,
                payments: p.value,
                balance: b.value,
            })
            .collect();
        return (rows, true);
    }

    log::warn!(
        "Dashboard trend series are not date-aligned (appointments={}, payments={}, balance={}); aligning by date",
        appointments.len(),
        payments.len(),
        balance.len()
    );

    let mut by_date: BTreeMap<&str, TrendRow> = BTreeMap::new();

    for point in appointments {
        by_date
            .entry(point.date.as_str())
            .or_insert_with(|| empty_row(&point.date))
            .appointments = point.value;
    }
    for point in payments {
        by_date
            .entry(point.date.as_str())
            .or_insert_with(|| empty_row(&point.date))
            .payments = point.value;
    }
    for point in balance {
        by_date
            .entry(point.date.as_str())
            .or_insert_with(|| empty_row(&point.date))
            .balance = point.value;
    }

    (by_date.into_values().collect(), false)
}
