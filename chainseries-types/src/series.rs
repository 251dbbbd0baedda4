//! Canonical `(timestamp, value)` series shared by every adapter.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Metric;

/// One observation of a metric.
///
/// Daily observations are stamped at 00:00 UTC of their calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Observation instant (UTC).
    pub ts: DateTime<Utc>,
    /// Observed value in the metric's canonical unit.
    pub value: f64,
}

impl Point {
    /// Build a daily point stamped at midnight UTC of `date`.
    #[must_use]
    pub fn daily(date: NaiveDate, value: f64) -> Self {
        Self {
            ts: date.and_time(chrono::NaiveTime::MIN).and_utc(),
            value,
        }
    }

    /// Calendar day (UTC) of the observation.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.ts.date_naive()
    }
}

/// Latest near-real-time observation from a live ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LivePoint {
    /// Instant of the tick (minute granularity for candle-based tickers).
    pub ts: DateTime<Utc>,
    /// Observed value in the metric's canonical unit.
    pub value: f64,
}

/// A chronologically sorted series, unique by timestamp.
///
/// Construction always normalizes: points are sorted ascending and duplicate
/// timestamps collapse to the last occurrence in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    metric: Metric,
    points: Vec<Point>,
}

impl TimeSeries {
    /// Build a normalized series from arbitrary points.
    #[must_use]
    pub fn new(metric: Metric, points: impl IntoIterator<Item = Point>) -> Self {
        let mut by_ts: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
        for p in points {
            by_ts.insert(p.ts, p.value);
        }
        Self {
            metric,
            points: by_ts
                .into_iter()
                .map(|(ts, value)| Point { ts, value })
                .collect(),
        }
    }

    /// Build a series from `(date, value)` pairs stamped at midnight UTC.
    #[must_use]
    pub fn from_daily(metric: Metric, rows: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        Self::new(metric, rows.into_iter().map(|(d, v)| Point::daily(d, v)))
    }

    /// An empty series for `metric`.
    #[must_use]
    pub const fn empty(metric: Metric) -> Self {
        Self {
            metric,
            points: Vec::new(),
        }
    }

    /// Metric this series measures.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        self.metric
    }

    /// Sorted, de-duplicated points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the series and return its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest point.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    /// Most recent point.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Value observed on `date`, if any.
    #[must_use]
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .iter()
            .rev()
            .find(|p| p.date() == date)
            .map(|p| p.value)
    }

    /// Values in chronological order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Sub-series restricted to the inclusive calendar range `[start, end]`.
    #[must_use]
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            metric: self.metric,
            points: self
                .points
                .iter()
                .filter(|p| {
                    let d = p.date();
                    d >= start && d <= end
                })
                .copied()
                .collect(),
        }
    }
}

/// An inclusive range of missing calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gap {
    /// First missing day.
    pub start: NaiveDate,
    /// Last missing day.
    pub end: NaiveDate,
}

impl Gap {
    /// Number of missing days covered by the gap.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
