use chrono::NaiveDate;

use crate::{LivePoint, Point, TimeSeries};

/// What a live splice did to the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    /// An existing point for today had its value replaced.
    Replaced,
    /// A new point for today was appended.
    Appended,
}

/// Splice a live tick into a daily series as today's observation.
///
/// If the series already holds a point dated `today`, only that point's value
/// changes; its timestamp and every other day stay untouched. Otherwise a new
/// midnight-stamped point for `today` is added. The result never holds two
/// points for today.
#[must_use]
pub fn splice_live(series: &TimeSeries, live: LivePoint, today: NaiveDate) -> (TimeSeries, SpliceOutcome) {
    let mut points: Vec<Point> = series.points().to_vec();
    let mut outcome = SpliceOutcome::Appended;
    for p in points.iter_mut().filter(|p| p.date() == today) {
        p.value = live.value;
        outcome = SpliceOutcome::Replaced;
    }
    if outcome == SpliceOutcome::Appended {
        points.push(Point::daily(today, live.value));
    }
    (TimeSeries::new(series.metric(), points), outcome)
}
