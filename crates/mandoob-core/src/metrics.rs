//! # Derived Metrics
//!
//! Pure rollups over a ledger snapshot and a reference date. Nothing here
//! caches: the ledger and the reference date both change between renders,
//! so every call recomputes from the full history.
//!
//! ## Time Zone Handling
//! All functions are generic over [`chrono::TimeZone`]: the reference date
//! carries the zone, and every stored UTC instant is converted into it
//! before any calendar comparison. Day membership is whole-calendar-date
//! equality (not a 24-hour window); weeks run Sunday through Saturday.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};

use crate::types::{Ledger, Transaction};
use crate::{DEFAULT_WEEKLY_TARGET, FUEL_ESTIMATE_FLOOR};

// =============================================================================
// Calendar Helpers
// =============================================================================

/// The Sunday-through-Saturday week containing `reference`, as inclusive
/// calendar dates in the reference's own time zone.
pub fn week_bounds<Tz: TimeZone>(reference: &DateTime<Tz>) -> (NaiveDate, NaiveDate) {
    let date = reference.date_naive();
    let start = date - Days::new(u64::from(reference.weekday().num_days_from_sunday()));
    (start, start + Days::new(6))
}

fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, reference: &DateTime<Tz>) -> NaiveDate {
    instant.with_timezone(&reference.timezone()).date_naive()
}

// =============================================================================
// Daily Sales
// =============================================================================

/// Transactions whose calendar date matches the reference date.
pub fn day_transactions<'a, Tz: TimeZone>(
    ledger: &'a Ledger,
    reference: &DateTime<Tz>,
) -> Vec<&'a Transaction> {
    let day = reference.date_naive();
    ledger
        .tx
        .iter()
        .filter(|t| local_date(&t.date, reference) == day)
        .collect()
}

/// Sum of amounts over the reference date's transactions.
pub fn day_total<Tz: TimeZone>(ledger: &Ledger, reference: &DateTime<Tz>) -> f64 {
    day_transactions(ledger, reference)
        .iter()
        .map(|t| t.amt)
        .sum()
}

// =============================================================================
// Weekly Target
// =============================================================================

/// Weekly-target progress for the home screen widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetProgress {
    /// Sales total inside the reference week.
    pub sales: f64,
    /// The effective target (stored value, or the default when the stored
    /// value is not a positive finite number).
    pub target: f64,
    /// Completion percentage, clamped to 0–100.
    pub percent: u32,
    /// Currency units still to sell this week, floored at zero.
    pub remaining: f64,
}

/// Sales progress against the weekly target for the week containing the
/// reference date.
pub fn weekly_target_progress<Tz: TimeZone>(
    ledger: &Ledger,
    reference: &DateTime<Tz>,
) -> TargetProgress {
    let (start, end) = week_bounds(reference);
    let sales: f64 = ledger
        .tx
        .iter()
        .filter(|t| {
            let d = local_date(&t.date, reference);
            start <= d && d <= end
        })
        .map(|t| t.amt)
        .sum();

    let stored = ledger.settings.weekly_target;
    let target = if stored.is_finite() && stored > 0.0 {
        stored
    } else {
        DEFAULT_WEEKLY_TARGET
    };

    let percent = ((sales / target * 100.0).round() as u32).min(100);
    TargetProgress {
        sales,
        target,
        percent,
        remaining: (target - sales).max(0.0),
    }
}

// =============================================================================
// Fuel
// =============================================================================

/// Month-to-date fuel aggregates plus the week-over-week spend projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelMetrics {
    /// Currency spent in the reference calendar month.
    pub month_cost: f64,
    /// Liters purchased in the reference calendar month.
    pub month_liters: f64,
    /// Kilometers driven in the reference calendar month.
    pub month_km: f64,
    /// Kilometers per liter for the month, rounded to one decimal.
    /// Zero when no liters were purchased.
    pub avg_efficiency: f64,
    /// Spend inside the reference week (Sunday through Saturday).
    pub week_cost: f64,
    /// Spend inside the week before the reference week.
    pub prev_week_cost: f64,
    /// Projected spend for next week: the mean of the current and previous
    /// weeks when the previous week had spend, otherwise the current week,
    /// otherwise a fixed floor.
    pub next_week_estimate: f64,
}

/// Fuel cost, consumption, and projection metrics for the reference date.
pub fn fuel_metrics<Tz: TimeZone>(ledger: &Ledger, reference: &DateTime<Tz>) -> FuelMetrics {
    let month = (reference.year(), reference.month());
    let (week_start, week_end) = week_bounds(reference);
    let prev_week_start = week_start - Days::new(7);
    let prev_week_end = week_start - Days::new(1);

    let mut month_cost = 0.0;
    let mut month_liters = 0.0;
    let mut month_km = 0.0;
    let mut week_cost = 0.0;
    let mut prev_week_cost = 0.0;

    for entry in &ledger.fuel_log {
        let d = local_date(&entry.date, reference);
        if (d.year(), d.month()) == month {
            month_cost += entry.amount;
            month_liters += entry.liters;
            month_km += entry.km;
        }
        if week_start <= d && d <= week_end {
            week_cost += entry.amount;
        } else if prev_week_start <= d && d <= prev_week_end {
            prev_week_cost += entry.amount;
        }
    }

    let avg_efficiency = if month_liters > 0.0 {
        (month_km / month_liters * 10.0).round() / 10.0
    } else {
        0.0
    };

    let next_week_estimate = if prev_week_cost > 0.0 {
        (week_cost + prev_week_cost) / 2.0
    } else if week_cost > 0.0 {
        week_cost
    } else {
        FUEL_ESTIMATE_FLOOR
    };

    FuelMetrics {
        month_cost,
        month_liters,
        month_km,
        avg_efficiency,
        week_cost,
        prev_week_cost,
        next_week_estimate,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
