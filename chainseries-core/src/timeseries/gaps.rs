use chrono::{NaiveDate, Utc};

use crate::{Gap, TimeSeries};

/// Detect missing calendar-day ranges relative to the current UTC date.
///
/// See [`detect_gaps_as_of`].
#[must_use]
pub fn detect_gaps(series: &TimeSeries, tolerance_days: i64) -> Vec<Gap> {
    detect_gaps_as_of(series, tolerance_days, Utc::now().date_naive())
}

/// Detect missing calendar-day ranges in a chronological series.
///
/// - Consecutive points more than `tolerance_days` apart yield a gap spanning
///   the days strictly between them.
/// - If the last point is more than `tolerance_days` behind yesterday, a
///   trailing gap runs from the day after it to yesterday. Today is never
///   flagged because its data may not be published yet.
/// - Empty and single-point series have no gaps.
///
/// Gaps are returned in chronological order.
#[must_use]
pub fn detect_gaps_as_of(series: &TimeSeries, tolerance_days: i64, today: NaiveDate) -> Vec<Gap> {
    let points = series.points();
    if points.len() < 2 {
        return Vec::new();
    }

    let mut gaps = Vec::new();
    for pair in points.windows(2) {
        let (prev, curr) = (pair[0].date(), pair[1].date());
        if (curr - prev).num_days() > tolerance_days {
            push_gap(&mut gaps, prev.succ_opt(), curr.pred_opt());
        }
    }

    if let (Some(last), Some(yesterday)) = (points.last(), today.pred_opt()) {
        let last = last.date();
        if (yesterday - last).num_days() > tolerance_days {
            push_gap(&mut gaps, last.succ_opt(), Some(yesterday));
        }
    }
    gaps
}

fn push_gap(gaps: &mut Vec<Gap>, start: Option<NaiveDate>, end: Option<NaiveDate>) {
    // a non-positive tolerance can flag adjacent days; there is nothing missing between them
    if let (Some(start), Some(end)) = (start, end)
        && start <= end
    {
        gaps.push(Gap { start, end });
    }
}
