//! Deterministic fixture values.
//!
//! Every metric follows a gentle linear trend with a weekly wiggle so that
//! moving averages and drawdowns have something to chew on.

use chainseries_core::{Metric, NaiveDate, TimeSeries};

/// First day served by the mock's full history.
pub const HISTORY_START: (i32, u32, u32) = (2023, 1, 1);
/// Last day served by the mock's full history.
pub const HISTORY_END: (i32, u32, u32) = (2024, 6, 30);

const EPOCH: (i32, u32, u32) = (2020, 1, 1);

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// `(base, daily_step, weekly_amplitude)` per metric, in canonical units.
const fn shape(metric: Metric) -> (f64, f64, f64) {
    match metric {
        Metric::Price => (30_000.0, 25.0, 600.0),
        Metric::HashRate => (150.0, 0.25, 8.0),
        Metric::Difficulty => (15.0e12, 40.0e9, 0.0),
        Metric::DifficultyAdjustment => (1.5, 0.0, 3.0),
        Metric::ActiveAddresses => (850_000.0, 50.0, 40_000.0),
        Metric::TransactionCount => (300_000.0, 60.0, 25_000.0),
        Metric::MinerRevenue => (25_000_000.0, 4_000.0, 1_500_000.0),
        Metric::MarketCap => (580.0e9, 0.5e9, 12.0e9),
        Metric::TransactionVolume => (9.0e9, 1.0e6, 1.5e9),
        Metric::NvtRatio => (60.0, 0.01, 8.0),
        Metric::MvrvRatio => (1.8, 0.0005, 0.05),
        Metric::Sopr => (1.01, 0.0, 0.015),
        Metric::LthSupply => (14_000_000.0, 500.0, 0.0),
        _ => (1.0, 0.0, 0.0),
    }
}

/// Fixture value of `metric` on `date`.
#[must_use]
pub fn value(metric: Metric, date: NaiveDate) -> f64 {
    let (base, step, amp) = shape(metric);
    let day = (date - ymd(EPOCH)).num_days() as f64;
    let wiggle = match (day as i64).rem_euclid(7) {
        0 => 0.0,
        1 | 6 => 0.5,
        2 | 5 => 1.0,
        _ => -1.0,
    };
    base + step * day + amp * wiggle
}

/// Fixture series covering every day of `[start, end]`.
#[must_use]
pub fn daily(metric: Metric, start: NaiveDate, end: NaiveDate) -> TimeSeries {
    let rows = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| (d, value(metric, d)));
    TimeSeries::from_daily(metric, rows)
}

/// Complete fixture history for `metric`.
#[must_use]
pub fn history(metric: Metric) -> TimeSeries {
    daily(metric, ymd(HISTORY_START), ymd(HISTORY_END))
}
