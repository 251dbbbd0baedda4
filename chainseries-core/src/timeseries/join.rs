use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{Metric, SeriesError, TimeSeries};

/// Divide two series day by day after an inner join on calendar date.
///
/// Days missing from either side produce no point, and so do days whose
/// denominator is zero, negative, or not finite.
///
/// # Errors
/// Returns `Err(SeriesError::Data)` if either input series is empty.
pub fn ratio_by_date(
    numerator: &TimeSeries,
    denominator: &TimeSeries,
    metric: Metric,
) -> Result<TimeSeries, SeriesError> {
    if numerator.is_empty() {
        return Err(SeriesError::Data(format!(
            "{} unavailable for {metric}",
            numerator.metric()
        )));
    }
    if denominator.is_empty() {
        return Err(SeriesError::Data(format!(
            "{} unavailable for {metric}",
            denominator.metric()
        )));
    }

    let by_date: BTreeMap<NaiveDate, f64> =
        denominator.points().iter().map(|p| (p.date(), p.value)).collect();

    let rows = numerator.points().iter().filter_map(|p| {
        let den = *by_date.get(&p.date())?;
        (den.is_finite() && den > 0.0).then(|| (p.date(), p.value / den))
    });
    Ok(TimeSeries::from_daily(metric, rows))
}
