use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Point, TimeSeries};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Descriptive aggregates over a whole series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of observations.
    pub count: usize,
    /// First observed day.
    pub first_date: NaiveDate,
    /// Last observed day.
    pub last_date: NaiveDate,
    /// Most recent value.
    pub last: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Sample standard deviation (0 for a single observation).
    pub std_dev: f64,
    /// Standard deviation relative to the mean, in percent.
    pub volatility_pct: f64,
    /// Largest peak-to-trough decline, in percent of the peak.
    pub max_drawdown_pct: f64,
    /// Annualized mean over standard deviation of daily percentage returns.
    pub sharpe_ratio: f64,
}

/// Current value of a metric compared against reference levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Most recent value.
    pub current: f64,
    /// Trailing moving average at the most recent point.
    pub moving_average: f64,
    /// Percent difference of `current` over `moving_average`.
    pub vs_moving_average_pct: Option<f64>,
    /// All-time high.
    pub all_time_high: f64,
    /// Percent difference of `current` over `all_time_high`.
    pub vs_all_time_high_pct: Option<f64>,
    /// Median of the whole series.
    pub median: f64,
    /// Percent difference of `current` over `median`.
    pub vs_median_pct: Option<f64>,
}

/// Summarize a series. Returns `None` for an empty series.
#[must_use]
pub fn summarize(series: &TimeSeries) -> Option<SeriesSummary> {
    let first = series.first()?;
    let last = series.last()?;
    let values: Vec<f64> = series.values().collect();

    let mean = mean(&values);
    let std_dev = sample_std(&values);
    let returns: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();
    let returns_std = sample_std(&returns);
    let sharpe_ratio = if returns.len() < 2 || returns_std == 0.0 {
        0.0
    } else {
        self::mean(&returns) / returns_std * TRADING_DAYS_PER_YEAR.sqrt()
    };

    Some(SeriesSummary {
        count: values.len(),
        first_date: first.date(),
        last_date: last.date(),
        last: last.value,
        mean,
        median: median(&values),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        std_dev,
        volatility_pct: if mean == 0.0 { 0.0 } else { std_dev / mean * 100.0 },
        max_drawdown_pct: max_drawdown_pct(&values),
        sharpe_ratio,
    })
}

/// Trailing moving average over `window` points.
///
/// Early points average over whatever history exists, so the output has the
/// same length and timestamps as the input. A zero window is treated as one.
#[must_use]
pub fn moving_average(series: &TimeSeries, window: usize) -> TimeSeries {
    let window = window.max(1);
    let points = series.points();
    let mut sum = 0.0;
    let mut out = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        sum += p.value;
        if i >= window {
            sum -= points[i - window].value;
        }
        let n = (i + 1).min(window);
        out.push(Point {
            ts: p.ts,
            value: sum / n as f64,
        });
    }
    TimeSeries::new(series.metric(), out)
}

/// Compare the latest value against its moving average, all-time high, and median.
#[must_use]
pub fn snapshot(series: &TimeSeries, ma_window: usize) -> Option<MetricSnapshot> {
    let current = series.last()?.value;
    let ma = moving_average(series, ma_window).last()?.value;
    let values: Vec<f64> = series.values().collect();
    let ath = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let med = median(&values);
    Some(MetricSnapshot {
        current,
        moving_average: ma,
        vs_moving_average_pct: pct_change(current, ma),
        all_time_high: ath,
        vs_all_time_high_pct: pct_change(current, ath),
        median: med,
        vs_median_pct: pct_change(current, med),
    })
}

fn pct_change(value: f64, reference: f64) -> Option<f64> {
    (reference != 0.0).then(|| (value - reference) / reference * 100.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn max_drawdown_pct(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &v in values {
        peak = peak.max(v);
        if peak > 0.0 {
            worst = worst.max((peak - v) / peak * 100.0);
        }
    }
    worst
}
