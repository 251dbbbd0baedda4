use crate::{Metric, Point, TimeSeries};

/// Merge series in priority order (first is highest).
///
/// Points are keyed by timestamp; the first appearance wins for duplicates.
#[must_use]
pub fn merge_by_priority<I>(metric: Metric, series: I) -> TimeSeries
where
    I: IntoIterator<Item = TimeSeries>,
{
    let all: Vec<TimeSeries> = series.into_iter().collect();
    // TimeSeries keeps the last duplicate, so feed the lowest priority first
    TimeSeries::new(metric, all.into_iter().rev().flat_map(TimeSeries::into_points))
}

/// Lay freshly fetched series over a base series.
///
/// Concatenates `base` with every series in `fresh`, then re-sorts and
/// de-duplicates with last-write-wins, so fetched data overrides what was
/// already there.
#[must_use]
pub fn overlay<I>(base: &TimeSeries, fresh: I) -> TimeSeries
where
    I: IntoIterator<Item = TimeSeries>,
{
    let points: Vec<Point> = base
        .points()
        .iter()
        .copied()
        .chain(fresh.into_iter().flat_map(TimeSeries::into_points))
        .collect();
    TimeSeries::new(base.metric(), points)
}
