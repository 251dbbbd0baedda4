//! Shared helpers for request validation.

use chrono::NaiveDate;

use crate::SeriesError;

/// Ensure a requested calendar range is well-formed.
///
/// # Errors
/// Returns `Err(SeriesError::InvalidArg)` if `start` is after `end`.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), SeriesError> {
    if start > end {
        return Err(SeriesError::InvalidArg(format!(
            "range start {start} is after end {end}"
        )));
    }
    Ok(())
}
